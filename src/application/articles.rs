//! Article queries: fetch from the content store, run the rendering
//! pipeline, and shape the result for the templates.

use std::sync::Arc;

use metrics::counter;
use time::{
    OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{
    application::{
        error::AppError,
        render::{self, ImageUrlResolver},
    },
    domain::posts::{PostDocument, PostSummary},
    infra::content::ContentStore,
    presentation::views::{ArticleCard, ArticleView, TocEntryView},
};

const PUBLISHED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

pub struct ArticleService {
    store: Arc<dyn ContentStore>,
    images: Arc<dyn ImageUrlResolver>,
    thumbnail_width: u32,
    thumbnail_height: u32,
}

impl ArticleService {
    pub fn new(store: Arc<dyn ContentStore>, images: Arc<dyn ImageUrlResolver>) -> Self {
        Self {
            store,
            images,
            thumbnail_width: 1200,
            thumbnail_height: 500,
        }
    }

    /// Fetch and render one article. `None` means the slug is unknown to the
    /// content store; the caller decides how "not found" looks.
    pub async fn article(&self, slug: &str) -> Result<Option<ArticleView>, AppError> {
        let document = match self.store.find_post(slug).await {
            Ok(Some(document)) => {
                counter!("brezza_content_fetch_total", "outcome" => "hit").increment(1);
                document
            }
            Ok(None) => {
                counter!("brezza_content_fetch_total", "outcome" => "miss").increment(1);
                return Ok(None);
            }
            Err(err) => {
                counter!("brezza_content_fetch_total", "outcome" => "error").increment(1);
                return Err(AppError::from(crate::infra::error::InfraError::from(err)));
            }
        };

        Ok(Some(self.build_view(document)))
    }

    /// Fetch the article listing, newest first as the store orders it.
    pub async fn listing(&self) -> Result<Vec<ArticleCard>, AppError> {
        let summaries = self.store.list_posts().await.map_err(|err| {
            counter!("brezza_content_fetch_total", "outcome" => "error").increment(1);
            AppError::from(crate::infra::error::InfraError::from(err))
        })?;
        counter!("brezza_content_fetch_total", "outcome" => "hit").increment(1);

        Ok(summaries
            .into_iter()
            .map(|summary| self.build_card(summary))
            .collect())
    }

    fn build_view(&self, document: PostDocument) -> ArticleView {
        let article = render::assemble(&document.slug, &document.sections, self.images.as_ref());
        let toc = render::synchronize(&article);
        let content_html = article.to_html();

        let thumbnail_url = document.thumbnail.as_ref().and_then(|thumbnail| {
            thumbnail.asset.as_ref().and_then(|asset| {
                self.images
                    .image_url(asset, self.thumbnail_width, self.thumbnail_height)
            })
        });
        let thumbnail_alt = document
            .thumbnail
            .as_ref()
            .and_then(|thumbnail| thumbnail.alt.clone())
            .unwrap_or_else(|| document.title.clone());

        ArticleView {
            slug: document.slug,
            title: document.title,
            description: document.description.unwrap_or_default(),
            author_name: document.author.as_ref().map(|author| author.name.clone()),
            author_avatar: document.author.and_then(|author| author.avatar),
            published: document.published_at.map(format_published),
            iso_date: document.published_at.and_then(format_iso),
            tags: document.tags,
            thumbnail_url,
            thumbnail_alt,
            toc: toc
                .into_iter()
                .map(|entry| TocEntryView {
                    label: entry.label,
                    anchor: entry.anchor,
                    level: entry.level,
                })
                .collect(),
            content_html,
        }
    }

    fn build_card(&self, summary: PostSummary) -> ArticleCard {
        let thumbnail_url = summary.thumbnail.as_ref().and_then(|thumbnail| {
            thumbnail
                .asset
                .as_ref()
                .and_then(|asset| self.images.image_url(asset, 600, 340))
        });

        ArticleCard {
            slug: summary.slug,
            title: summary.title,
            description: summary.description.unwrap_or_default(),
            published: summary.published_at.map(format_published),
            iso_date: summary.published_at.and_then(format_iso),
            tags: summary.tags,
            thumbnail_url,
        }
    }
}

/// "January 2, 2026" — the byline format the templates and the social
/// preview card share.
pub fn format_published(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(&PUBLISHED_FORMAT)
        .unwrap_or_else(|_| timestamp.date().to_string())
}

fn format_iso(timestamp: OffsetDateTime) -> Option<String> {
    timestamp.format(&Rfc3339).ok()
}
