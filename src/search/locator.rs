//! Finding canonical terms inside canonical page text.
//!
//! Matching is an exact substring search first. When that finds nothing the
//! search is repeated with all spaces removed from both sides, which absorbs
//! renderer spacing the term does not have (or the other way round); the hits
//! are projected back onto the spaced text.

use crate::config::SearchConfig;
use crate::text::{canonicalize, CanonicalIndex};

/// A half-open range of canonical character positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchRange {
    /// First canonical position of the match
    pub start: usize,
    /// One past the last canonical position
    pub end: usize,
}

impl MatchRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of canonical characters covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers nothing.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Start positions of every occurrence of `needle`, overlapping ones included.
fn occurrences(haystack: &[char], needle: &[char]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(start, _)| start)
        .collect()
}

/// Find `term` in `text`, both already canonical.
///
/// Returns every exact occurrence; if there is none, every occurrence of the
/// space-free term in the space-free text, mapped back to spaced positions.
pub fn find_canonical(text: &[char], term: &[char]) -> Vec<MatchRange> {
    let exact: Vec<MatchRange> = occurrences(text, term)
        .into_iter()
        .map(|start| MatchRange::new(start, start + term.len()))
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let stripped_term: Vec<char> = term.iter().copied().filter(|&c| c != ' ').collect();
    if stripped_term.is_empty() {
        return Vec::new();
    }

    let mut stripped_text = Vec::with_capacity(text.len());
    let mut positions = Vec::with_capacity(text.len());
    for (pos, &c) in text.iter().enumerate() {
        if c != ' ' {
            stripped_text.push(c);
            positions.push(pos);
        }
    }

    occurrences(&stripped_text, &stripped_term)
        .into_iter()
        .map(|start| {
            let last = start + stripped_term.len() - 1;
            MatchRange::new(positions[start], positions[last] + 1)
        })
        .collect()
}

/// Canonicalize `term` and find it in the index, without a length floor.
///
/// An empty or fully unmappable term yields no matches.
///
/// # Examples
///
/// ```
/// use pdf_anchor::search::find_matches;
/// use pdf_anchor::text::CanonicalIndex;
///
/// let index = CanonicalIndex::build(&["foo  bar"]);
/// let matches = find_matches(&index, "Foo bar");
/// assert_eq!(matches.len(), 1);
/// assert_eq!((matches[0].start, matches[0].end), (0, 7));
/// ```
pub fn find_matches(index: &CanonicalIndex, term: &str) -> Vec<MatchRange> {
    let term: Vec<char> = canonicalize(term).chars().collect();
    find_canonical(index.chars(), &term)
}

/// Term matching with the configured minimum length.
#[derive(Debug, Clone, Copy)]
pub struct MatchLocator {
    min_term_chars: usize,
}

impl MatchLocator {
    /// Create a locator with an explicit length floor.
    pub fn new(min_term_chars: usize) -> Self {
        Self { min_term_chars }
    }

    /// Create a locator from search configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.min_term_chars)
    }

    /// Canonical form of `term`, or `None` if it is too short to search.
    pub fn canonical_term(&self, term: &str) -> Option<Vec<char>> {
        let canonical: Vec<char> = canonicalize(term).chars().collect();
        if canonical.is_empty() || canonical.len() < self.min_term_chars {
            log::debug!("Discarding search term {:?}: too short", term);
            return None;
        }
        Some(canonical)
    }

    /// Find every occurrence of `term` in the index.
    pub fn locate(&self, index: &CanonicalIndex, term: &str) -> Vec<MatchRange> {
        match self.canonical_term(term) {
            Some(canonical) => find_canonical(index.chars(), &canonical),
            None => Vec::new(),
        }
    }
}

impl Default for MatchLocator {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_exact_reports_overlapping_occurrences() {
        let found = find_canonical(&chars("aaaa"), &chars("aa"));
        assert_eq!(
            found,
            vec![MatchRange::new(0, 2), MatchRange::new(1, 3), MatchRange::new(2, 4)]
        );
    }

    #[test]
    fn test_fallback_tolerates_extra_space_in_text() {
        let found = find_canonical(&chars("the quan tum effect"), &chars("quantum"));
        assert_eq!(found, vec![MatchRange::new(4, 12)]);
    }

    #[test]
    fn test_fallback_tolerates_extra_space_in_term() {
        let found = find_canonical(&chars("a dataset here"), &chars("data set"));
        assert_eq!(found, vec![MatchRange::new(2, 9)]);
    }

    #[test]
    fn test_fallback_not_used_when_exact_hits() {
        // "ab c" would also hit "abc" without spaces
        let found = find_canonical(&chars("ab c abc"), &chars("abc"));
        assert_eq!(found, vec![MatchRange::new(5, 8)]);
    }

    #[test]
    fn test_empty_and_blank_terms() {
        assert!(find_canonical(&chars("text"), &[]).is_empty());
        assert!(find_canonical(&chars("text"), &chars(" ")).is_empty());
        assert!(find_canonical(&[], &chars("x")).is_empty());
    }

    #[test]
    fn test_find_matches_is_case_insensitive() {
        let index = CanonicalIndex::build(&["Deep RESIDUAL learning"]);
        assert_eq!(find_matches(&index, "residual").len(), 1);
        assert_eq!(find_matches(&index, "“Residual”").len(), 1);
    }

    #[test]
    fn test_locator_floor() {
        let index = CanonicalIndex::build(&["the cat sat on the mat"]);
        let locator = MatchLocator::default();
        assert!(locator.locate(&index, "cat").is_empty());
        assert!(locator.locate(&index, "...").is_empty());
        assert_eq!(locator.locate(&index, "the cat").len(), 1);
        assert_eq!(MatchLocator::new(3).locate(&index, "the").len(), 2);
    }

    #[test]
    fn test_match_range_len() {
        assert_eq!(MatchRange::new(3, 7).len(), 4);
        assert!(MatchRange::new(3, 3).is_empty());
    }
}
