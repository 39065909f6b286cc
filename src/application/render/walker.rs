//! Ordered walk over one section's content nodes.
//!
//! Dispatch is stateless per node with one exception: contiguous list items
//! of the same kind coalesce into a single list container. A change of list
//! kind — or any intervening non-list node — terminates the current run.

use tracing::warn;

use crate::domain::content::{ContentNode, ListKind, TextBlock};

use super::{
    blocks, marks, objects,
    types::{ImageUrlResolver, MAX_SECTION_NODES, RenderError, RenderedBlock},
};

/// Walk `nodes` in authored order and build the rendered block sequence.
///
/// Malformed nodes (missing required references) and unknown kinds render
/// nothing; the error return is reserved for content that violates the
/// section size bound.
pub fn walk(
    nodes: &[ContentNode],
    images: &dyn ImageUrlResolver,
) -> Result<Vec<RenderedBlock>, RenderError> {
    if nodes.len() > MAX_SECTION_NODES {
        return Err(RenderError::SectionTooLarge {
            count: nodes.len(),
            limit: MAX_SECTION_NODES,
        });
    }

    let mut out = Vec::with_capacity(nodes.len());
    let mut run: Option<(ListKind, Vec<String>)> = None;

    for node in nodes {
        if let ContentNode::TextBlock(block) = node
            && let Some(kind) = block.list_kind()
        {
            push_list_item(&mut out, &mut run, kind, block);
            continue;
        }

        flush_list(&mut out, &mut run);

        if let Some(rendered) = render_node(node, images) {
            out.push(rendered);
        }
    }

    flush_list(&mut out, &mut run);
    Ok(out)
}

fn push_list_item(
    out: &mut Vec<RenderedBlock>,
    run: &mut Option<(ListKind, Vec<String>)>,
    kind: ListKind,
    block: &TextBlock,
) {
    let item_html = marks::render_spans(&block.resolved_spans());
    match run {
        Some((open_kind, items)) if *open_kind == kind => items.push(item_html),
        _ => {
            flush_list(out, run);
            *run = Some((kind, vec![item_html]));
        }
    }
}

fn flush_list(out: &mut Vec<RenderedBlock>, run: &mut Option<(ListKind, Vec<String>)>) {
    if let Some((kind, items)) = run.take() {
        out.push(RenderedBlock::List { kind, items });
    }
}

fn render_node(node: &ContentNode, images: &dyn ImageUrlResolver) -> Option<RenderedBlock> {
    match node {
        ContentNode::TextBlock(block) => Some(blocks::render_text_block(block)),
        ContentNode::Image(image) => objects::render_image(image, images),
        ContentNode::VideoEmbed(video) => objects::render_video(video),
        ContentNode::File(file) => objects::render_file(file),
        ContentNode::Unknown => {
            warn!(
                target = "application::render",
                "skipping content node with unknown kind"
            );
            None
        }
    }
}
