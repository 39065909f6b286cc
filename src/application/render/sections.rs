//! Section assembly: the top-level entry into the rendering pipeline.
//!
//! Sections render independently and concatenate in document order. A
//! failure inside one section degrades that section to a placeholder and
//! leaves the rest of the article untouched; nothing here propagates past
//! this boundary.

use tracing::warn;

use crate::domain::{anchor::derive_anchor, content::PortableSection};

use super::{
    types::{ImageUrlResolver, RenderedArticle, RenderedSection},
    walker,
};

/// Assemble the presentation tree for one article.
///
/// Each section's anchor is derived from its title; a document with zero
/// sections assembles into an empty article rather than an error.
pub fn assemble(
    slug: &str,
    sections: &[PortableSection],
    images: &dyn ImageUrlResolver,
) -> RenderedArticle {
    let mut rendered = Vec::with_capacity(sections.len());

    for section in sections {
        let anchor = derive_anchor(&section.title);

        match walker::walk(&section.content, images) {
            Ok(blocks) => rendered.push(RenderedSection {
                title: section.title.clone(),
                anchor,
                blocks,
                degraded: false,
            }),
            Err(err) => {
                warn!(
                    target = "application::render",
                    slug = %slug,
                    section = %section.title,
                    error = %err,
                    "section content failed to render; degrading to placeholder"
                );
                rendered.push(RenderedSection {
                    title: section.title.clone(),
                    anchor,
                    blocks: Vec::new(),
                    degraded: true,
                });
            }
        }
    }

    RenderedArticle { sections: rendered }
}
