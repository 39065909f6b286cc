//! Portable-content rendering pipeline.
//!
//! A single synchronous pass: the section assembler derives anchors and
//! delegates each section's nodes to the walker, which dispatches to the
//! block, mark and embedded-object renderers. The result is a plain tree
//! value; HTML serialization and table-of-contents synchronization both read
//! from that tree, so they cannot drift apart.

mod blocks;
mod marks;
mod objects;
mod sections;
mod toc;
mod types;
mod walker;

pub use sections::assemble;
pub use toc::synchronize;
pub use types::{
    ImageUrlResolver, MAX_SECTION_NODES, RenderError, RenderedArticle, RenderedBlock,
    RenderedSection, VideoPlayer,
};
