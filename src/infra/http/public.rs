use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State, rejection::JsonRejection},
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    application::{
        articles::ArticleService,
        error::{ErrorReport, HttpError},
        newsletter::{NewsletterService, SubscribeError, Subscription},
        preview::{PreviewError, PreviewImageService},
    },
    config::SiteSettings,
    presentation::views::{
        ArticleView, IndexContext, IndexTemplate, LayoutChrome, LayoutContext, PageMetaView,
        PostTemplate, SiteChromeView, render_not_found_response, render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub articles: Arc<ArticleService>,
    pub newsletter: Arc<NewsletterService>,
    pub preview: Arc<PreviewImageService>,
    pub site: Arc<SiteSettings>,
}

impl HttpState {
    fn chrome(&self) -> LayoutChrome {
        LayoutChrome {
            site: SiteChromeView {
                title: self.site.title.clone(),
                tagline: self.site.description.clone(),
            },
            meta: PageMetaView {
                title: self.site.title.clone(),
                description: self.site.description.clone(),
                canonical: self.site.public_url.clone(),
                og_image: None,
            },
        }
    }
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/posts/{slug}", get(post_detail))
        .route("/posts/{slug}/opengraph.png", get(preview_image))
        .route("/api/newsletter", post(newsletter_subscribe))
        .route("/_health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome();

    match state.articles.listing().await {
        Ok(cards) => {
            let canonical = canonical_url(&state.site.public_url, "/");
            let view = LayoutContext::new(
                chrome.with_canonical(canonical),
                IndexContext { cards },
            );
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => err.into_response(),
    }
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let chrome = state.chrome();

    match state.articles.article(&slug).await {
        Ok(Some(content)) => {
            let canonical = canonical_url(&state.site.public_url, &format!("/posts/{slug}"));
            let meta = article_meta(&chrome, &content, canonical)
                .with_og_image(canonical_url(
                    &state.site.public_url,
                    &format!("/posts/{slug}/opengraph.png"),
                ));
            let view = LayoutContext::new(chrome.with_meta(meta), content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => err.into_response(),
    }
}

async fn preview_image(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::preview_image";

    match state.preview.preview_png(&slug).await {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, "image/png")
            .header(CACHE_CONTROL, "public, max-age=3600")
            .body(Body::from(png))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(PreviewError::NotFound) => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Blog post not found",
            "no document for requested slug",
        )
        .into_response(),
        Err(err) => {
            // Internal diagnostic endpoint: a short failure description in
            // the body is acceptable here.
            let mut response = (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate image: {err}"),
            )
                .into_response();
            ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubscribeRequest {
    #[serde(default)]
    email: String,
}

async fn newsletter_subscribe(
    State(state): State<HttpState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Response {
    const SOURCE: &str = "infra::http::public::newsletter_subscribe";

    let email = match payload {
        Ok(Json(request)) => request.email,
        Err(rejection) => {
            let mut response = (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Please provide a valid email address"})),
            )
                .into_response();
            ErrorReport::from_message(SOURCE, StatusCode::BAD_REQUEST, rejection.to_string())
                .attach(&mut response);
            return response;
        }
    };

    match state.newsletter.subscribe(&email).await {
        Ok(Subscription::Created) => (
            StatusCode::OK,
            Json(json!({
                "message": "Successfully subscribed to our newsletter! Check your email for confirmation."
            })),
        )
            .into_response(),
        Ok(Subscription::Duplicate) => (
            StatusCode::OK,
            Json(json!({"message": "You are already subscribed to our newsletter!"})),
        )
            .into_response(),
        Err(SubscribeError::InvalidAddress) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Please provide a valid email address"})),
        )
            .into_response(),
        Err(err @ SubscribeError::NotConfigured) => {
            let mut response = (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Newsletter service is not configured properly"})),
            )
                .into_response();
            ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
        Err(err) => {
            let mut response = (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to subscribe. Please try again later."})),
            )
                .into_response();
            ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                .attach(&mut response);
            response
        }
    }
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome())
}

fn article_meta(chrome: &LayoutChrome, content: &ArticleView, canonical: String) -> PageMetaView {
    let description = if content.description.trim().is_empty() {
        chrome.meta.description.clone()
    } else {
        content.description.clone()
    };

    chrome
        .meta
        .clone()
        .with_canonical(canonical)
        .with_content(content.title.clone(), description)
}

pub(crate) fn canonical_url(base: &str, path: &str) -> String {
    let root = normalize_public_site_url(base);
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        root
    } else {
        format!("{root}{trimmed}")
    }
}

fn normalize_public_site_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    format!("{trimmed}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_joins_without_double_slashes() {
        assert_eq!(
            canonical_url("https://blog.example.com/", "/posts/hello"),
            "https://blog.example.com/posts/hello"
        );
        assert_eq!(
            canonical_url("https://blog.example.com", "/"),
            "https://blog.example.com/"
        );
    }
}
