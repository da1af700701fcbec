//! Splitting ellipsis-truncated citations into independently searchable clauses.
//!
//! Quoted citations often elide the middle of a passage:
//! `"Attention is all you need ... Transformer architecture"`. Each side of
//! an ellipsis is searched on its own.

use crate::text::canonicalize;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Three or more dots, or the ellipsis glyph
    static ref RE_ELLIPSIS: Regex = Regex::new(r"\.{3,}|…").unwrap();

    /// Ellipsis runs at the start of the term
    static ref RE_LEADING_ELLIPSIS: Regex = Regex::new(r"^\s*(?:(?:\.{3,}|…)\s*)+").unwrap();

    /// Ellipsis runs at the end of the term
    static ref RE_TRAILING_ELLIPSIS: Regex = Regex::new(r"(?:\s*(?:\.{3,}|…))+\s*$").unwrap();
}

/// Split a raw term on ellipses.
///
/// Leading and trailing ellipsis runs are removed first; empty clauses are
/// dropped. A term without ellipses comes back as a single clause.
///
/// # Examples
///
/// ```
/// use pdf_anchor::search::split_clauses;
///
/// let clauses = split_clauses("… Attention is all you need ... Transformer architecture…");
/// assert_eq!(clauses, vec!["Attention is all you need", "Transformer architecture"]);
/// ```
pub fn split_clauses(term: &str) -> Vec<String> {
    let trimmed = RE_LEADING_ELLIPSIS.replace(term, "");
    let trimmed = RE_TRAILING_ELLIPSIS.replace(&trimmed, "");

    RE_ELLIPSIS
        .split(&trimmed)
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(str::to_string)
        .collect()
}

/// Clauses long enough to search, at least `min_chars` canonical characters each.
pub fn candidate_clauses(term: &str, min_chars: usize) -> Vec<String> {
    split_clauses(term)
        .into_iter()
        .filter(|clause| {
            let len = canonicalize(clause).chars().count();
            if len == 0 || len < min_chars {
                log::debug!("Dropping short clause {:?}", clause);
                false
            } else {
                true
            }
        })
        .collect()
}
