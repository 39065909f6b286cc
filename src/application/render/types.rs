use thiserror::Error;

use crate::domain::content::{ImageAsset, ListKind};

/// Defensive bound on nodes per section. Documents are authored by hand and
/// stay far below this; blowing through it means the store handed us
/// something degenerate, and the section degrades instead of the page.
pub const MAX_SECTION_NODES: usize = 512;

/// Pixel size images are requested at from the image CDN.
pub const IMAGE_WIDTH: u32 = 800;
pub const IMAGE_HEIGHT: u32 = 600;

/// Seam to the external image-URL collaborator. The renderer never builds
/// asset URLs itself; it hands the reference to whatever the host wired in.
pub trait ImageUrlResolver: Send + Sync {
    fn image_url(&self, asset: &ImageAsset, width: u32, height: u32) -> Option<String>;
}

/// Structured errors surfaced by the walk over one section's content.
/// Contained at the section boundary; they never replace the page.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("section content holds {count} nodes, above the {limit} limit")]
    SectionTooLarge { count: usize, limit: usize },
}

/// Video playback surface selected by URL sniffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoPlayer {
    YouTube { id: String },
    Vimeo { id: String },
    Direct { url: String },
}

/// One rendered block-level node. Every content-node kind the document model
/// declares maps onto exactly one of these arms, so a new authoring kind
/// fails compilation here instead of silently falling through.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBlock {
    Paragraph {
        inline_html: String,
    },
    Heading {
        level: u8,
        anchor: Option<String>,
        /// Plain heading text; the label the table of contents shows.
        text: String,
        inline_html: String,
    },
    Quote {
        inline_html: String,
    },
    List {
        kind: ListKind,
        /// Inline HTML per item, in authored order.
        items: Vec<String>,
    },
    Image {
        src: String,
        alt: String,
        caption: Option<String>,
    },
    Video {
        player: VideoPlayer,
        title: Option<String>,
        caption: Option<String>,
    },
    Download {
        href: String,
        label: String,
        description: Option<String>,
    },
}

impl RenderedBlock {
    pub fn write_html(&self, out: &mut String) {
        match self {
            RenderedBlock::Paragraph { inline_html } => {
                out.push_str("<p>");
                out.push_str(inline_html);
                out.push_str("</p>");
            }
            RenderedBlock::Heading {
                level,
                anchor,
                inline_html,
                ..
            } => {
                out.push_str("<h");
                out.push_str(&level.to_string());
                if let Some(anchor) = anchor {
                    out.push_str(" id=\"");
                    out.push_str(&escape_attribute(anchor));
                    out.push('"');
                }
                out.push('>');
                out.push_str(inline_html);
                out.push_str("</h");
                out.push_str(&level.to_string());
                out.push('>');
            }
            RenderedBlock::Quote { inline_html } => {
                out.push_str("<blockquote data-role=\"post-quote\">");
                out.push_str(inline_html);
                out.push_str("</blockquote>");
            }
            RenderedBlock::List { kind, items } => {
                let tag = match kind {
                    ListKind::Bullet => "ul",
                    ListKind::Number => "ol",
                };
                out.push('<');
                out.push_str(tag);
                out.push_str(" data-role=\"post-list\">");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(item);
                    out.push_str("</li>");
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            RenderedBlock::Image { src, alt, caption } => {
                out.push_str("<figure data-role=\"post-image\"><img src=\"");
                out.push_str(&escape_attribute(src));
                out.push_str("\" alt=\"");
                out.push_str(&escape_attribute(alt));
                out.push_str("\" loading=\"lazy\" decoding=\"async\" />");
                write_caption(out, caption.as_deref());
                out.push_str("</figure>");
            }
            RenderedBlock::Video {
                player,
                title,
                caption,
            } => {
                out.push_str("<figure data-role=\"post-video\">");
                write_player(out, player, title.as_deref());
                write_caption(out, caption.as_deref());
                out.push_str("</figure>");
            }
            RenderedBlock::Download {
                href,
                label,
                description,
            } => {
                out.push_str("<div data-role=\"post-attachment\"><a href=\"");
                out.push_str(&escape_attribute(href));
                out.push_str("\" download=\"");
                out.push_str(&escape_attribute(label));
                out.push_str("\">");
                out.push_str(&escape_text(label));
                out.push_str("</a>");
                if let Some(description) = description {
                    out.push_str("<p>");
                    out.push_str(&escape_text(description));
                    out.push_str("</p>");
                }
                out.push_str("</div>");
            }
        }
    }
}

fn write_player(out: &mut String, player: &VideoPlayer, title: Option<&str>) {
    match player {
        VideoPlayer::YouTube { id } => {
            out.push_str("<iframe src=\"https://www.youtube.com/embed/");
            out.push_str(&escape_attribute(id));
            out.push_str("\" title=\"");
            out.push_str(&escape_attribute(title.unwrap_or("YouTube video")));
            out.push_str(
                "\" allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; \
                 gyroscope; picture-in-picture\" allowfullscreen></iframe>",
            );
        }
        VideoPlayer::Vimeo { id } => {
            out.push_str("<iframe src=\"https://player.vimeo.com/video/");
            out.push_str(&escape_attribute(id));
            out.push_str("\" title=\"");
            out.push_str(&escape_attribute(title.unwrap_or("Vimeo video")));
            out.push_str(
                "\" allow=\"autoplay; fullscreen; picture-in-picture\" allowfullscreen></iframe>",
            );
        }
        VideoPlayer::Direct { url } => {
            out.push_str("<video src=\"");
            out.push_str(&escape_attribute(url));
            out.push('"');
            if let Some(title) = title {
                out.push_str(" title=\"");
                out.push_str(&escape_attribute(title));
                out.push('"');
            }
            out.push_str(" controls></video>");
        }
    }
}

fn write_caption(out: &mut String, caption: Option<&str>) {
    if let Some(caption) = caption {
        out.push_str("<figcaption>");
        out.push_str(&escape_text(caption));
        out.push_str("</figcaption>");
    }
}

/// One rendered article section: its own heading plus the walked content.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection {
    pub title: String,
    pub anchor: Option<String>,
    pub blocks: Vec<RenderedBlock>,
    /// Set when the section's content failed to render and was replaced by
    /// the unavailability placeholder.
    pub degraded: bool,
}

impl RenderedSection {
    pub fn write_html(&self, out: &mut String) {
        out.push_str("<section>");
        out.push_str("<h2");
        if let Some(anchor) = &self.anchor {
            out.push_str(" id=\"");
            out.push_str(&escape_attribute(anchor));
            out.push('"');
        }
        out.push('>');
        out.push_str(&escape_text(&self.title));
        out.push_str("</h2>");
        if self.degraded {
            out.push_str(
                "<p data-role=\"content-unavailable\">This section is temporarily \
                 unavailable.</p>",
            );
        } else {
            for block in &self.blocks {
                block.write_html(out);
            }
        }
        out.push_str("</section>");
    }
}

/// The assembled presentation tree for one article, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedArticle {
    pub sections: Vec<RenderedSection>,
}

impl RenderedArticle {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            section.write_html(&mut out);
        }
        out
    }
}

pub(crate) fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub(crate) fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}
