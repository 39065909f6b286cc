//! Portable content model.
//!
//! Articles arrive from the content store as ordered, titled sections of
//! typed nodes. The wire shape is loosely typed JSON; this module pins it
//! down as a closed discriminated union so every node kind the renderer can
//! meet is an explicit match arm. Payloads that match no known discriminator
//! deserialize into [`ContentNode::Unknown`] and are quarantined downstream
//! instead of failing the document.

use serde::Deserialize;
use tracing::debug;

/// A titled slice of an article. The title feeds both the rendered section
/// heading and the section's anchor; derivation happens at render time, so
/// the same title always yields the same anchor.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PortableSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Vec<ContentNode>,
}

/// Block-level node, discriminated by the store's `_type` field.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum ContentNode {
    #[serde(rename = "block")]
    TextBlock(TextBlock),
    #[serde(rename = "image")]
    Image(ImageNode),
    #[serde(rename = "videoEmbed")]
    VideoEmbed(VideoEmbedNode),
    #[serde(rename = "file")]
    File(FileNode),
    /// Any discriminator this release does not understand. Kept so a new
    /// authoring type degrades to a logged skip rather than a decode failure.
    #[serde(other)]
    Unknown,
}

/// Rich-text block: a run of spans plus block-level styling.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(default)]
    pub children: Vec<SpanRecord>,
    /// Present when the block is a list item. Kept as the raw string so an
    /// unrecognized list kind degrades instead of failing the decode.
    #[serde(default)]
    pub list_item: Option<String>,
    /// List nesting depth as authored. Carried for fidelity; rendering
    /// flattens runs of items into a single container per contiguous run.
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
}

impl TextBlock {
    /// Spans with their raw mark strings resolved into typed marks.
    ///
    /// Decorator names map directly; anything else is treated as a
    /// mark-definition key and looked up in `mark_defs`. Unresolvable marks
    /// are dropped with a log line so content authors can spot them.
    pub fn resolved_spans(&self) -> Vec<Span> {
        self.children
            .iter()
            .map(|record| Span {
                text: record.text.clone(),
                marks: record
                    .marks
                    .iter()
                    .filter_map(|mark| self.resolve_mark(mark))
                    .collect(),
            })
            .collect()
    }

    fn resolve_mark(&self, mark: &str) -> Option<Mark> {
        match mark {
            "strong" => Some(Mark::Strong),
            "em" => Some(Mark::Emphasis),
            "code" => Some(Mark::Code),
            key => {
                let def = self.mark_defs.iter().find(|def| def.key == key);
                match def {
                    Some(def) if def.kind == "link" => Some(Mark::Link {
                        href: def.href.clone(),
                    }),
                    Some(def) => {
                        debug!(
                            target = "domain::content",
                            kind = %def.kind,
                            "skipping unsupported mark annotation"
                        );
                        None
                    }
                    None => {
                        debug!(
                            target = "domain::content",
                            mark = %key,
                            "skipping mark with no matching definition"
                        );
                        None
                    }
                }
            }
        }
    }

    /// List kind when the block is an item of a known list style.
    pub fn list_kind(&self) -> Option<ListKind> {
        match self.list_item.as_deref() {
            Some("bullet") => Some(ListKind::Bullet),
            Some("number") => Some(ListKind::Number),
            Some(other) => {
                debug!(
                    target = "domain::content",
                    kind = %other,
                    "unrecognized list kind; rendering block as a paragraph"
                );
                None
            }
            None => None,
        }
    }

    /// Concatenated, whitespace-normalized span text. This is the exact
    /// input heading anchors are derived from.
    pub fn plain_text(&self) -> String {
        let joined = self
            .children
            .iter()
            .map(|span| span.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Block style as authored. Unrecognized styles fall back to `Other`,
/// which renders like a plain paragraph.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(from = "String")]
pub enum BlockStyle {
    #[default]
    Normal,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Blockquote,
    Other,
}

impl From<String> for BlockStyle {
    fn from(style: String) -> Self {
        match style.as_str() {
            "normal" => BlockStyle::Normal,
            "h1" => BlockStyle::H1,
            "h2" => BlockStyle::H2,
            "h3" => BlockStyle::H3,
            "h4" => BlockStyle::H4,
            "h5" => BlockStyle::H5,
            "h6" => BlockStyle::H6,
            "blockquote" => BlockStyle::Blockquote,
            _ => BlockStyle::Other,
        }
    }
}

impl BlockStyle {
    /// Heading level for heading styles, `None` otherwise.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            BlockStyle::H1 => Some(1),
            BlockStyle::H2 => Some(2),
            BlockStyle::H3 => Some(3),
            BlockStyle::H4 => Some(4),
            BlockStyle::H5 => Some(5),
            BlockStyle::H6 => Some(6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Number,
}

/// One span of text as stored: raw text plus unresolved mark strings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SpanRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// Out-of-band mark definition referenced from span marks by key.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// A span with marks resolved. Marks are non-exclusive: a span may be
/// simultaneously bold, code and linked.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub marks: Vec<Mark>,
}

impl Span {
    pub fn has(&self, mark: &Mark) -> bool {
        self.marks.contains(mark)
    }

    /// First link mark, if any.
    pub fn link(&self) -> Option<&Mark> {
        self.marks
            .iter()
            .find(|mark| matches!(mark, Mark::Link { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Strong,
    Emphasis,
    Code,
    Link { href: Option<String> },
}

/// Embedded image reference.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ImageNode {
    #[serde(default)]
    pub asset: Option<ImageAsset>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Image asset pointer: either the raw reference or the expanded asset
/// document, depending on how the query projected it.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ImageAsset {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// External video embed (YouTube, Vimeo or a direct file URL).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct VideoEmbedNode {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Generic uploaded file (GIFs, screen recordings, attachments).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileNode {
    #[serde(default)]
    pub asset: Option<FileAsset>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileAsset {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_block_resolves_link_marks_through_definitions() {
        let json = serde_json::json!({
            "_type": "block",
            "style": "normal",
            "markDefs": [{"_key": "a1b2", "_type": "link", "href": "/pricing"}],
            "children": [
                {"_type": "span", "text": "see ", "marks": []},
                {"_type": "span", "text": "pricing", "marks": ["strong", "a1b2"]}
            ]
        });

        let node: ContentNode = serde_json::from_value(json).expect("decode");
        let ContentNode::TextBlock(block) = node else {
            panic!("expected text block");
        };

        let spans = block.resolved_spans();
        assert_eq!(spans.len(), 2);
        assert!(spans[1].has(&Mark::Strong));
        assert_eq!(
            spans[1].link(),
            Some(&Mark::Link {
                href: Some("/pricing".to_string())
            })
        );
    }

    #[test]
    fn dangling_mark_keys_are_dropped() {
        let block = TextBlock {
            children: vec![SpanRecord {
                text: "text".to_string(),
                marks: vec!["missing-key".to_string(), "em".to_string()],
            }],
            ..TextBlock::default()
        };

        let spans = block.resolved_spans();
        assert_eq!(spans[0].marks, vec![Mark::Emphasis]);
    }

    #[test]
    fn unknown_discriminators_quarantine_instead_of_failing() {
        let json = serde_json::json!({"_type": "callout", "tone": "info"});
        let node: ContentNode = serde_json::from_value(json).expect("decode");
        assert_eq!(node, ContentNode::Unknown);
    }

    #[test]
    fn unknown_block_style_falls_back_to_normal_rendering() {
        let json = serde_json::json!({
            "_type": "block",
            "style": "lead",
            "children": [{"_type": "span", "text": "intro"}]
        });
        let node: ContentNode = serde_json::from_value(json).expect("decode");
        let ContentNode::TextBlock(block) = node else {
            panic!("expected text block");
        };
        assert_eq!(block.style, BlockStyle::Other);
        assert_eq!(block.style.heading_level(), None);
    }

    #[test]
    fn plain_text_normalizes_whitespace_across_spans() {
        let block = TextBlock {
            children: vec![
                SpanRecord {
                    text: "Getting  ".to_string(),
                    marks: Vec::new(),
                },
                SpanRecord {
                    text: " started".to_string(),
                    marks: Vec::new(),
                },
            ],
            ..TextBlock::default()
        };
        assert_eq!(block.plain_text(), "Getting started");
    }

    #[test]
    fn file_without_asset_still_decodes() {
        let json = serde_json::json!({"_type": "file", "title": "Demo"});
        let node: ContentNode = serde_json::from_value(json).expect("decode");
        let ContentNode::File(file) = node else {
            panic!("expected file node");
        };
        assert!(file.asset.is_none());
    }
}
