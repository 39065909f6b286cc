//! Text-block rendering: paragraphs, headings and quotes.
//!
//! Headings additionally derive their anchor from the block's plain text —
//! the same text the table of contents later shows as the entry label.

use crate::domain::{
    anchor::derive_anchor,
    content::{BlockStyle, TextBlock},
};

use super::{marks, types::RenderedBlock};

/// Render a non-list text block. List items are grouped by the walker and
/// never reach this function.
pub fn render_text_block(block: &TextBlock) -> RenderedBlock {
    let inline_html = marks::render_spans(&block.resolved_spans());

    if let Some(level) = block.style.heading_level() {
        let text = block.plain_text();
        let anchor = derive_anchor(&text);
        RenderedBlock::Heading {
            level,
            anchor,
            text,
            inline_html,
        }
    } else if block.style == BlockStyle::Blockquote {
        RenderedBlock::Quote { inline_html }
    } else {
        RenderedBlock::Paragraph { inline_html }
    }
}
