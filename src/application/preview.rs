//! Social preview images.
//!
//! A fixed-size 1200×630 card is composed per article from its title,
//! description, author and publish date: an SVG template is filled in,
//! rasterized, and PNG-encoded. Results are cached per slug; a missing
//! article is a 404 at the HTTP layer, a composition failure a 500 with a
//! short diagnostic (this is an internal endpoint, not reader-facing
//! content).

use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex},
};

use askama::Template;
use lru::LruCache;
use metrics::counter;
use thiserror::Error;

use crate::{
    application::articles::format_published,
    domain::posts::PostDocument,
    infra::content::{ContentStore, ContentStoreError},
};

pub const PREVIEW_WIDTH: u32 = 1200;
pub const PREVIEW_HEIGHT: u32 = 630;

const TITLE_WRAP_COLUMNS: usize = 34;
const TITLE_MAX_LINES: usize = 2;
const DESCRIPTION_WRAP_COLUMNS: usize = 70;
const DESCRIPTION_MAX_LINES: usize = 3;
const CACHE_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("article not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] ContentStoreError),
    #[error("preview template failed: {0}")]
    Template(String),
    #[error("preview rasterisation failed: {0}")]
    Render(String),
}

#[derive(Template)]
#[template(path = "og_card.svg", escape = "none")]
struct PreviewCardTemplate {
    width: u32,
    height: u32,
    site_title: String,
    title_lines: Vec<String>,
    description_lines: Vec<String>,
    byline: String,
}

pub struct PreviewImageService {
    store: Arc<dyn ContentStore>,
    site_title: String,
    fontdb: Arc<fontdb::Database>,
    cache: Mutex<LruCache<String, Vec<u8>>>,
}

impl PreviewImageService {
    pub fn new(store: Arc<dyn ContentStore>, site_title: impl Into<String>) -> Self {
        let mut fonts = fontdb::Database::new();
        fonts.load_system_fonts();

        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            site_title: site_title.into(),
            fontdb: Arc::new(fonts),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub async fn preview_png(&self, slug: &str) -> Result<Vec<u8>, PreviewError> {
        if let Ok(mut cache) = self.cache.lock()
            && let Some(cached) = cache.get(slug)
        {
            counter!("brezza_preview_render_total", "outcome" => "cached").increment(1);
            return Ok(cached.clone());
        }

        let document = self
            .store
            .find_post(slug)
            .await?
            .ok_or(PreviewError::NotFound)?;

        let png = self.compose(&document).inspect_err(|_| {
            counter!("brezza_preview_render_total", "outcome" => "error").increment(1);
        })?;
        counter!("brezza_preview_render_total", "outcome" => "rendered").increment(1);

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(slug.to_string(), png.clone());
        }

        Ok(png)
    }

    fn compose(&self, document: &PostDocument) -> Result<Vec<u8>, PreviewError> {
        let byline = {
            let mut parts = Vec::new();
            if let Some(author) = &document.author {
                if !author.name.is_empty() {
                    parts.push(author.name.clone());
                }
            }
            if let Some(published_at) = document.published_at {
                parts.push(format_published(published_at));
            }
            parts.join(" • ")
        };

        let template = PreviewCardTemplate {
            width: PREVIEW_WIDTH,
            height: PREVIEW_HEIGHT,
            site_title: xml_escape(&self.site_title),
            title_lines: wrap_lines(&document.title, TITLE_WRAP_COLUMNS, TITLE_MAX_LINES),
            description_lines: document
                .description
                .as_deref()
                .map(|description| {
                    wrap_lines(description, DESCRIPTION_WRAP_COLUMNS, DESCRIPTION_MAX_LINES)
                })
                .unwrap_or_default(),
            byline: xml_escape(&byline),
        };

        let svg = template
            .render()
            .map_err(|err| PreviewError::Template(err.to_string()))?;

        self.rasterize(&svg)
    }

    fn rasterize(&self, svg: &str) -> Result<Vec<u8>, PreviewError> {
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };

        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|err| PreviewError::Render(format!("failed to parse SVG: {err}")))?;

        let mut pixmap = tiny_skia::Pixmap::new(PREVIEW_WIDTH, PREVIEW_HEIGHT)
            .ok_or_else(|| PreviewError::Render("failed to allocate pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|err| PreviewError::Render(format!("failed to encode PNG: {err}")))
    }
}

fn wrap_lines(text: &str, columns: usize, max_lines: usize) -> Vec<String> {
    textwrap::wrap(text, columns)
        .into_iter()
        .take(max_lines)
        .map(|line| xml_escape(&line))
        .collect()
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_respects_the_line_budget() {
        let lines = wrap_lines(
            "A very long article title that certainly cannot fit on one line of the card",
            TITLE_WRAP_COLUMNS,
            TITLE_MAX_LINES,
        );
        assert!(lines.len() <= TITLE_MAX_LINES);
        assert!(lines.iter().all(|line| line.len() <= TITLE_WRAP_COLUMNS));
    }

    #[test]
    fn svg_text_is_escaped() {
        let lines = wrap_lines("Ampersands & <angles>", 80, 1);
        assert_eq!(lines, vec!["Ampersands &amp; &lt;angles&gt;"]);
    }
}
