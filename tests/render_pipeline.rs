//! End-to-end checks over the portable-content rendering pipeline: a
//! representative document goes in, and the rendered tree, its HTML and the
//! synchronized table of contents are inspected together.

use brezza::application::render::{
    self, ImageUrlResolver, RenderedBlock, VideoPlayer,
};
use brezza::domain::content::{
    ContentNode, FileNode, ImageAsset, ImageNode, ListKind, MarkDef, PortableSection, SpanRecord,
    TextBlock, VideoEmbedNode,
};

struct CdnStub;

impl ImageUrlResolver for CdnStub {
    fn image_url(&self, asset: &ImageAsset, width: u32, height: u32) -> Option<String> {
        asset
            .url
            .as_ref()
            .map(|url| format!("{url}?w={width}&h={height}&fit=crop"))
    }
}

fn span(text: &str, marks: &[&str]) -> SpanRecord {
    SpanRecord {
        text: text.to_string(),
        marks: marks.iter().map(|mark| mark.to_string()).collect(),
    }
}

fn block(style: &str, children: Vec<SpanRecord>) -> ContentNode {
    ContentNode::TextBlock(TextBlock {
        style: style.to_string().into(),
        children,
        ..TextBlock::default()
    })
}

fn list_item(kind: &str, text: &str) -> ContentNode {
    ContentNode::TextBlock(TextBlock {
        list_item: Some(kind.to_string()),
        children: vec![span(text, &[])],
        ..TextBlock::default()
    })
}

fn sample_document() -> Vec<PortableSection> {
    vec![
        PortableSection {
            title: "Getting Started".to_string(),
            content: vec![
                block("normal", vec![span("Welcome to the series.", &[])]),
                block("h3", vec![span("Hello, World! 2024", &[])]),
                ContentNode::TextBlock(TextBlock {
                    style: "normal".to_string().into(),
                    children: vec![span("bold link", &["strong", "cta"])],
                    mark_defs: vec![MarkDef {
                        key: "cta".to_string(),
                        kind: "link".to_string(),
                        href: Some("/x".to_string()),
                    }],
                    ..TextBlock::default()
                }),
                list_item("bullet", "a"),
                list_item("bullet", "b"),
                list_item("number", "c"),
            ],
        },
        PortableSection {
            title: "Media".to_string(),
            content: vec![
                ContentNode::VideoEmbed(VideoEmbedNode {
                    url: Some("https://youtu.be/abc123?t=5".to_string()),
                    title: Some("Launch recap".to_string()),
                    caption: None,
                }),
                ContentNode::Image(ImageNode {
                    asset: Some(ImageAsset {
                        url: Some("https://cdn.example.com/pic.jpg".to_string()),
                        ..ImageAsset::default()
                    }),
                    alt: Some("A picture".to_string()),
                    caption: Some("The team at work".to_string()),
                }),
                // Malformed: a file node with no asset renders nothing.
                ContentNode::File(FileNode {
                    title: Some("Ghost attachment".to_string()),
                    ..FileNode::default()
                }),
            ],
        },
    ]
}

#[test]
fn anchors_in_the_toc_match_the_rendered_tree_exactly() {
    let sections = sample_document();
    let article = render::assemble("demo-post", &sections, &CdnStub);
    let toc = render::synchronize(&article);

    // Re-walk the rendered output by hand and collect anchors in order.
    let mut expected = Vec::new();
    for section in &article.sections {
        if let Some(anchor) = &section.anchor {
            expected.push(anchor.clone());
        }
        for node in &section.blocks {
            if let RenderedBlock::Heading {
                anchor: Some(anchor),
                ..
            } = node
            {
                expected.push(anchor.clone());
            }
        }
    }

    let actual: Vec<String> = toc
        .entries()
        .iter()
        .map(|entry| entry.anchor.clone())
        .collect();
    assert_eq!(actual, expected);
    assert_eq!(
        actual,
        vec!["getting-started", "hello-world-2024", "media"]
    );

    // Every TOC anchor resolves to an id attribute in the emitted HTML.
    let html = article.to_html();
    for anchor in &actual {
        assert!(
            html.contains(&format!("id=\"{anchor}\"")),
            "missing id for anchor `{anchor}`"
        );
    }
}

#[test]
fn heading_anchor_uses_the_documented_derivation() {
    let sections = sample_document();
    let article = render::assemble("demo-post", &sections, &CdnStub);
    let html = article.to_html();
    assert!(html.contains("<h3 id=\"hello-world-2024\">Hello, World! 2024</h3>"));
}

#[test]
fn contiguous_list_items_coalesce_into_two_containers() {
    let sections = sample_document();
    let article = render::assemble("demo-post", &sections, &CdnStub);

    let lists: Vec<&RenderedBlock> = article.sections[0]
        .blocks
        .iter()
        .filter(|block| matches!(block, RenderedBlock::List { .. }))
        .collect();
    assert_eq!(lists.len(), 2);

    let RenderedBlock::List { kind, items } = lists[0] else {
        unreachable!();
    };
    assert_eq!(*kind, ListKind::Bullet);
    assert_eq!(items.as_slice(), ["a", "b"]);

    let RenderedBlock::List { kind, items } = lists[1] else {
        unreachable!();
    };
    assert_eq!(*kind, ListKind::Number);
    assert_eq!(items.as_slice(), ["c"]);

    let html = article.to_html();
    assert!(html.contains("<ul data-role=\"post-list\"><li>a</li><li>b</li></ul>"));
    assert!(html.contains("<ol data-role=\"post-list\"><li>c</li></ol>"));
}

#[test]
fn marks_compose_into_a_single_nested_element() {
    let sections = sample_document();
    let article = render::assemble("demo-post", &sections, &CdnStub);
    let html = article.to_html();
    assert!(html.contains("<a href=\"/x\"><strong>bold link</strong></a>"));
}

#[test]
fn video_embed_extracts_the_platform_identifier() {
    let sections = sample_document();
    let article = render::assemble("demo-post", &sections, &CdnStub);

    let video = article.sections[1]
        .blocks
        .iter()
        .find_map(|block| match block {
            RenderedBlock::Video { player, .. } => Some(player),
            _ => None,
        })
        .expect("video block");
    assert_eq!(
        *video,
        VideoPlayer::YouTube {
            id: "abc123".to_string()
        }
    );

    let html = article.to_html();
    assert!(html.contains("https://www.youtube.com/embed/abc123"));
}

#[test]
fn malformed_file_node_is_omitted_without_degrading_the_section() {
    let sections = sample_document();
    let article = render::assemble("demo-post", &sections, &CdnStub);

    let media = &article.sections[1];
    assert!(!media.degraded);
    // Video and image survive; the asset-less file renders nothing.
    assert_eq!(media.blocks.len(), 2);

    let html = article.to_html();
    assert!(html.contains("<h2 id=\"media\">Media</h2>"));
    assert!(!html.contains("Ghost attachment"));
}

#[test]
fn image_urls_are_delegated_to_the_resolver() {
    let sections = sample_document();
    let article = render::assemble("demo-post", &sections, &CdnStub);
    let html = article.to_html();
    // Query separators are attribute-escaped in the emitted markup.
    assert!(html.contains("https://cdn.example.com/pic.jpg?w=800&amp;h=600&amp;fit=crop"));
    assert!(html.contains("<figcaption>The team at work</figcaption>"));
}

#[test]
fn rendering_is_deterministic_across_passes() {
    let sections = sample_document();
    let first = render::assemble("demo-post", &sections, &CdnStub);
    let second = render::assemble("demo-post", &sections, &CdnStub);
    assert_eq!(first, second);
    assert_eq!(
        render::synchronize(&first).entries(),
        render::synchronize(&second).entries()
    );
}
