//! Canonical index over one rendered page's text fragments.
//!
//! The index pairs the canonical text of a page with a mapping that points
//! every canonical character back at the fragment character it came from.
//! It is only valid for the rendering pass that produced the fragments and
//! must be rebuilt whenever the page re-renders.

use super::canonical::{canonical_chars, CharKind};

/// One positioned text node of a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    /// Text content of the node
    pub text: String,
}

impl TextFragment {
    /// Create a fragment from its text content.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl AsRef<str> for TextFragment {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<&str> for TextFragment {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Where a canonical character came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharMapping {
    /// A character of fragment `fragment` at character offset `offset`.
    ///
    /// Expanded glyphs produce several entries with the same offset.
    Real {
        /// Fragment id (position in the page's fragment list)
        fragment: usize,
        /// Character offset within the fragment text
        offset: usize,
    },
    /// A space inserted between two fragments, backed by nothing.
    Virtual,
}

impl CharMapping {
    /// Whether the entry has no backing character.
    pub fn is_virtual(&self) -> bool {
        matches!(self, CharMapping::Virtual)
    }
}

/// Canonical text of a page plus its per-character source mapping.
///
/// `chars()` and `mapping()` always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalIndex {
    chars: Vec<char>,
    mapping: Vec<CharMapping>,
}

impl CanonicalIndex {
    /// Build the index for fragments in rendering order.
    ///
    /// A virtual space is inserted before every fragment unless the text so far
    /// already ends in a space, so the last word of one fragment and the first
    /// word of the next never fuse into a false word.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_anchor::text::CanonicalIndex;
    ///
    /// let index = CanonicalIndex::build(&["Attention is", "all you need."]);
    /// assert_eq!(index.text(), "attention is all you need");
    /// assert_eq!(index.len(), index.mapping().len());
    /// ```
    pub fn build<S: AsRef<str>>(fragments: &[S]) -> Self {
        let mut index = CanonicalIndex::default();

        for (fragment, text) in fragments.iter().enumerate() {
            if index.chars.last().is_some_and(|&c| c != ' ') {
                index.push(' ', CharMapping::Virtual);
            }

            for (offset, c) in text.as_ref().chars().enumerate() {
                let real = CharMapping::Real { fragment, offset };
                let mut emitted = Vec::new();
                let kind = canonical_chars(c, |ch| emitted.push(ch));
                match kind {
                    CharKind::Quote => {},
                    CharKind::Text => {
                        for ch in emitted {
                            index.push(ch, real);
                        }
                    },
                    CharKind::Separator => {
                        if index.chars.last() != Some(&' ') {
                            index.push(' ', real);
                        }
                    },
                }
            }
        }

        index.trim();
        index
    }

    fn push(&mut self, c: char, mapping: CharMapping) {
        self.chars.push(c);
        self.mapping.push(mapping);
    }

    /// Drop leading and trailing spaces from text and mapping together.
    fn trim(&mut self) {
        let end = self
            .chars
            .iter()
            .rposition(|&c| c != ' ')
            .map_or(0, |pos| pos + 1);
        self.chars.truncate(end);
        self.mapping.truncate(end);

        let start = self.chars.iter().position(|&c| c != ' ').unwrap_or(0);
        self.chars.drain(..start);
        self.mapping.drain(..start);
    }

    /// Canonical characters.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Source mapping, aligned with [`chars`](Self::chars).
    pub fn mapping(&self) -> &[CharMapping] {
        &self.mapping
    }

    /// Canonical text as a string.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Number of canonical characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the page produced no canonical text.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}
