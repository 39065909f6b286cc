//! Article entities as returned by the content store.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::content::{ImageAsset, PortableSection};

/// Listing-level view of an article.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
}

/// Full article document: summary metadata plus the portable content tree.
///
/// Immutable once fetched; the renderer never mutates it and every render
/// works on its own instance.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub sections: Vec<PortableSection>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Thumbnail {
    #[serde(default)]
    pub asset: Option<ImageAsset>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_document_decodes_store_payload() {
        let json = serde_json::json!({
            "title": "Shipping the renderer",
            "slug": "shipping-the-renderer",
            "description": "How the pipeline came together",
            "author": {"name": "Ada"},
            "tags": ["engineering"],
            "publishedAt": "2025-11-03T09:00:00Z",
            "sections": [
                {"title": "Background", "content": []}
            ]
        });

        let post: PostDocument = serde_json::from_value(json).expect("decode");
        assert_eq!(post.slug, "shipping-the-renderer");
        assert_eq!(post.sections.len(), 1);
        assert_eq!(post.published_at.map(|t| t.year()), Some(2025));
    }

    #[test]
    fn missing_optional_metadata_is_tolerated() {
        let json = serde_json::json!({"title": "Untitled", "slug": "untitled"});
        let post: PostDocument = serde_json::from_value(json).expect("decode");
        assert!(post.author.is_none());
        assert!(post.published_at.is_none());
        assert!(post.sections.is_empty());
    }
}
