//! Inline mark resolution.
//!
//! Spans arrive with a set of non-exclusive marks; the resolved output nests
//! them in a fixed order — `code` innermost, then `em`, then `strong`, with
//! any link wrapping the lot. The order is cosmetic only: all marks on a
//! span apply simultaneously.

use crate::domain::content::{Mark, Span};

use super::types::{escape_attribute, escape_text};

/// Render a run of spans, preserving span order and per-span marks exactly.
pub fn render_spans(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        out.push_str(&render_span(span));
    }
    out
}

fn render_span(span: &Span) -> String {
    let mut html = escape_text(&span.text);

    if span.has(&Mark::Code) {
        html = format!("<code>{html}</code>");
    }
    if span.has(&Mark::Emphasis) {
        html = format!("<em>{html}</em>");
    }
    if span.has(&Mark::Strong) {
        html = format!("<strong>{html}</strong>");
    }

    if let Some(Mark::Link { href }) = span.link() {
        html = match href.as_deref() {
            // A link annotation without a target renders its children
            // unstyled rather than producing a dead link.
            None => html,
            Some(href) => wrap_link(href, &html),
        };
    }

    html
}

fn wrap_link(href: &str, inner: &str) -> String {
    let escaped = escape_attribute(href);
    if href.starts_with("http") {
        // External navigation opens in a new tab; the rel pair keeps the
        // opened page from reaching back to this window.
        format!(
            "<a href=\"{escaped}\" target=\"_blank\" rel=\"noopener noreferrer\">{inner}</a>"
        )
    } else {
        format!("<a href=\"{escaped}\">{inner}</a>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, marks: Vec<Mark>) -> Span {
        Span {
            text: text.to_string(),
            marks,
        }
    }

    #[test]
    fn plain_text_is_escaped() {
        let html = render_spans(&[span("1 < 2 & 3", Vec::new())]);
        assert_eq!(html, "1 &lt; 2 &amp; 3");
    }

    #[test]
    fn strong_and_link_compose_instead_of_overriding() {
        let html = render_spans(&[span(
            "bold link",
            vec![
                Mark::Strong,
                Mark::Link {
                    href: Some("/x".to_string()),
                },
            ],
        )]);
        assert_eq!(html, "<a href=\"/x\"><strong>bold link</strong></a>");
    }

    #[test]
    fn all_marks_nest_code_innermost_link_outermost() {
        let html = render_spans(&[span(
            "x",
            vec![
                Mark::Code,
                Mark::Emphasis,
                Mark::Strong,
                Mark::Link {
                    href: Some("https://example.com".to_string()),
                },
            ],
        )]);
        assert_eq!(
            html,
            "<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">\
             <strong><em><code>x</code></em></strong></a>"
        );
    }

    #[test]
    fn external_links_open_in_a_new_tab() {
        let html = render_spans(&[span(
            "docs",
            vec![Mark::Link {
                href: Some("https://docs.example.com".to_string()),
            }],
        )]);
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("rel=\"noopener noreferrer\""));
    }

    #[test]
    fn relative_links_stay_in_tab() {
        let html = render_spans(&[span(
            "about",
            vec![Mark::Link {
                href: Some("/about".to_string()),
            }],
        )]);
        assert_eq!(html, "<a href=\"/about\">about</a>");
    }

    #[test]
    fn link_without_target_renders_text_unstyled() {
        let html = render_spans(&[span("orphan", vec![Mark::Link { href: None }])]);
        assert_eq!(html, "orphan");
    }

    #[test]
    fn span_order_is_preserved() {
        let html = render_spans(&[
            span("first ", Vec::new()),
            span("second", vec![Mark::Emphasis]),
        ]);
        assert_eq!(html, "first <em>second</em>");
    }
}
