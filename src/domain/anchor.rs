//! Deterministic anchor identifiers for in-page navigation.
//!
//! Section titles and heading text are reduced to lowercase, hyphen-separated
//! fragments (`slug` crate) so external links of the form
//! `/posts/article#anchor` stay stable across renders. Derivation is a pure
//! function of the source text: identical headings produce identical anchors,
//! and the table of contents re-derives nothing — it reads the anchors the
//! renderer actually emitted.

use slug::slugify;

/// Derive the anchor fragment for a heading or section title.
///
/// Returns `None` when the input contains nothing representable
/// (empty or punctuation-only text); callers omit the `id` attribute
/// entirely rather than emitting an empty one.
pub fn derive_anchor(text: &str) -> Option<String> {
    let candidate = slugify(text);
    if candidate.is_empty() {
        None
    } else {
        Some(candidate)
    }
}

/// One navigable target in a rendered article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorEntry {
    pub label: String,
    pub anchor: String,
    /// Heading level of the carrying element (2 for section headings).
    pub level: u8,
}

/// Ordered list of anchors produced by a single render pass.
///
/// Rebuilt on every render; never cached across requests. Uniqueness is not
/// guaranteed — two identical headings collide, and both entries are kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnchorIndex {
    entries: Vec<AnchorEntry>,
}

impl AnchorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, anchor: impl Into<String>, level: u8) {
        self.entries.push(AnchorEntry {
            label: label.into(),
            anchor: anchor.into(),
            level,
        });
    }

    pub fn entries(&self) -> &[AnchorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for AnchorIndex {
    type Item = AnchorEntry;
    type IntoIter = std::vec::IntoIter<AnchorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_anchor_collapses_punctuation_runs() {
        assert_eq!(
            derive_anchor("Hello, World! 2024").as_deref(),
            Some("hello-world-2024")
        );
    }

    #[test]
    fn derive_anchor_strips_edge_hyphens() {
        assert_eq!(
            derive_anchor("  --Getting Started--  ").as_deref(),
            Some("getting-started")
        );
    }

    #[test]
    fn derive_anchor_is_a_fixed_point_on_its_own_output() {
        let first = derive_anchor("What's New In v2?").expect("anchor");
        let second = derive_anchor(&first).expect("anchor");
        assert_eq!(first, second);
    }

    #[test]
    fn derive_anchor_rejects_punctuation_only_input() {
        assert_eq!(derive_anchor("!!!"), None);
        assert_eq!(derive_anchor(""), None);
    }

    #[test]
    fn identical_headings_collide_by_design() {
        let mut index = AnchorIndex::new();
        for _ in 0..2 {
            let anchor = derive_anchor("Overview").expect("anchor");
            index.push("Overview", anchor, 3);
        }
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[0].anchor, index.entries()[1].anchor);
    }
}
