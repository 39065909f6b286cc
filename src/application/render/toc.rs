//! Table-of-contents synchronization.
//!
//! The navigation index is built from the rendered tree itself, never from
//! the source document, so every entry points at an anchor that actually
//! exists in the output. Section headings and content headings appear in the
//! order they were emitted.

use crate::domain::anchor::AnchorIndex;

use super::types::{RenderedArticle, RenderedBlock};

/// Heading level the assembler emits for section titles.
const SECTION_HEADING_LEVEL: u8 = 2;

/// Build the navigation index for a rendered article.
///
/// Only nodes that carry an anchor become entries; headings whose anchor
/// derivation yielded nothing are navigation-invisible, matching the markup.
pub fn synchronize(article: &RenderedArticle) -> AnchorIndex {
    let mut index = AnchorIndex::new();

    for section in &article.sections {
        if let Some(anchor) = &section.anchor {
            index.push(section.title.clone(), anchor.clone(), SECTION_HEADING_LEVEL);
        }

        for block in &section.blocks {
            if let RenderedBlock::Heading {
                level,
                anchor: Some(anchor),
                text,
                ..
            } = block
            {
                index.push(text.clone(), anchor.clone(), *level);
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::types::RenderedSection;

    fn heading(level: u8, text: &str, anchor: Option<&str>) -> RenderedBlock {
        RenderedBlock::Heading {
            level,
            anchor: anchor.map(str::to_string),
            text: text.to_string(),
            inline_html: text.to_string(),
        }
    }

    #[test]
    fn entries_follow_rendered_order() {
        let article = RenderedArticle {
            sections: vec![
                RenderedSection {
                    title: "Intro".to_string(),
                    anchor: Some("intro".to_string()),
                    blocks: vec![heading(3, "Why", Some("why"))],
                    degraded: false,
                },
                RenderedSection {
                    title: "Wrap Up".to_string(),
                    anchor: Some("wrap-up".to_string()),
                    blocks: Vec::new(),
                    degraded: false,
                },
            ],
        };

        let index = synchronize(&article);
        let anchors: Vec<&str> = index
            .entries()
            .iter()
            .map(|entry| entry.anchor.as_str())
            .collect();
        assert_eq!(anchors, vec!["intro", "why", "wrap-up"]);
        assert_eq!(index.entries()[1].level, 3);
    }

    #[test]
    fn anchorless_headings_produce_no_entries() {
        let article = RenderedArticle {
            sections: vec![RenderedSection {
                title: "!!!".to_string(),
                anchor: None,
                blocks: vec![heading(4, "???", None)],
                degraded: false,
            }],
        };

        let index = synchronize(&article);
        assert!(index.is_empty());
    }

    #[test]
    fn degraded_sections_still_surface_their_own_anchor() {
        let article = RenderedArticle {
            sections: vec![RenderedSection {
                title: "Flaky".to_string(),
                anchor: Some("flaky".to_string()),
                blocks: Vec::new(),
                degraded: true,
            }],
        };

        let index = synchronize(&article);
        assert_eq!(index.len(), 1);
        assert_eq!(index.entries()[0].anchor, "flaky");
    }
}
