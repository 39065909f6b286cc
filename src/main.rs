use std::{process, sync::Arc};

use brezza::{
    application::{
        articles::ArticleService,
        error::AppError,
        newsletter::{MailingListProvider, NewsletterService},
        preview::PreviewImageService,
        render::ImageUrlResolver,
    },
    config,
    infra::{
        content::{ContentStore, SanityContentStore, image::SanityImageUrls},
        error::InfraError,
        http::{self, HttpState},
        newsletter::MailchimpClient,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    if settings.content.project_id.is_empty() {
        warn!(
            target = "brezza::startup",
            "content store project id is empty; article fetches will fail"
        );
    }

    let store: Arc<dyn ContentStore> =
        Arc::new(SanityContentStore::new(&settings.content).map_err(InfraError::from)?);
    let images: Arc<dyn ImageUrlResolver> = Arc::new(SanityImageUrls::new(&settings.content));

    let provider: Option<Arc<dyn MailingListProvider>> = match &settings.newsletter {
        Some(newsletter) => Some(Arc::new(MailchimpClient::new(newsletter)?)),
        None => {
            warn!(
                target = "brezza::startup",
                "newsletter provider is not configured; capture endpoint will answer 500"
            );
            None
        }
    };

    let state = HttpState {
        articles: Arc::new(ArticleService::new(Arc::clone(&store), images)),
        newsletter: Arc::new(NewsletterService::new(provider)),
        preview: Arc::new(PreviewImageService::new(store, settings.site.title.clone())),
        site: Arc::new(settings.site.clone()),
    };

    let router = http::build_router(state);
    info!(
        target = "brezza::startup",
        site = %settings.site.public_url,
        "starting public server"
    );

    http::serve(&settings.server, router).await?;
    Ok(())
}
