//! Tests for match location and geometry resolution.

use pdf_anchor::geometry::{Point, Rect};
use pdf_anchor::layer::{MemoryFragment, MemoryTextLayer};
use pdf_anchor::search::{
    candidate_clauses, find_matches, fragment_runs, resolve_geometry, resolve_scaled,
    FragmentRun, MatchLocator, MatchRange,
};
use pdf_anchor::text::CanonicalIndex;

/// Helper: a page laid out one fragment per line, 6px per char, 12px lines.
fn layer(fragments: &[&str]) -> MemoryTextLayer {
    MemoryTextLayer::from_texts(Point::new(0.0, 100.0), fragments, 6.0, 12.0)
}

mod locating {
    use super::*;

    #[test]
    fn test_finds_overlapping_occurrences() {
        let index = CanonicalIndex::build(&["aaaa"]);
        let hits = find_matches(&index, "aa");
        assert_eq!(
            hits,
            vec![MatchRange::new(0, 2), MatchRange::new(1, 3), MatchRange::new(2, 4)]
        );
    }

    #[test]
    fn test_term_is_canonicalized() {
        let index = CanonicalIndex::build(&["Energy is $E = mc^2$ with α decay"]);
        assert_eq!(find_matches(&index, r"with \alpha decay").len(), 1);
        assert_eq!(find_matches(&index, "WITH Α DECAY").len(), 1);
    }

    #[test]
    fn test_whitespace_fallback_when_exact_fails() {
        let index = CanonicalIndex::build(&["fo", "o  bar"]);
        assert_eq!(index.text(), "fo o bar");

        let hits = find_matches(&index, "foo bar");
        assert_eq!(hits, vec![MatchRange::new(0, 8)]);

        let runs = fragment_runs(&index, hits[0]);
        assert_eq!(
            runs,
            vec![
                FragmentRun {
                    fragment: 0,
                    start: 0,
                    end: 2
                },
                FragmentRun {
                    fragment: 1,
                    start: 0,
                    end: 6
                },
            ]
        );
    }

    #[test]
    fn test_exact_hit_suppresses_fallback() {
        let index = CanonicalIndex::build(&["foo bar and fo obar"]);
        assert_eq!(find_matches(&index, "foo bar"), vec![MatchRange::new(0, 7)]);
    }

    #[test]
    fn test_ligature_short_term() {
        let index = CanonicalIndex::build(&["the ﬁeld"]);
        let hits = find_matches(&index, "fi");
        assert_eq!(hits, vec![MatchRange::new(4, 6)]);
        assert_eq!(
            fragment_runs(&index, hits[0]),
            vec![FragmentRun {
                fragment: 0,
                start: 4,
                end: 5
            }]
        );
    }

    #[test]
    fn test_locator_applies_length_floor() {
        let index = CanonicalIndex::build(&["the ﬁeld"]);
        let locator = MatchLocator::default();
        assert!(locator.locate(&index, "fi").is_empty());
        assert_eq!(locator.locate(&index, "field").len(), 1);
    }

    #[test]
    fn test_empty_term_matches_nothing() {
        let index = CanonicalIndex::build(&["anything"]);
        assert!(find_matches(&index, "").is_empty());
        assert!(find_matches(&index, "“ ”").is_empty());
    }
}

mod clauses {
    use super::*;

    #[test]
    fn test_ellipsis_splits_clauses() {
        assert_eq!(
            candidate_clauses("Attention is all you need ... Transformer architecture", 4),
            vec!["Attention is all you need", "Transformer architecture"]
        );
    }

    #[test]
    fn test_unicode_ellipsis_and_edges() {
        assert_eq!(
            candidate_clauses("…the model…achieves results...", 4),
            vec!["the model", "achieves results"]
        );
    }

    #[test]
    fn test_short_clauses_are_dropped() {
        assert_eq!(candidate_clauses("a ... long enough clause", 4), vec!["long enough clause"]);
        assert!(candidate_clauses("ab ... cd", 4).is_empty());
    }
}

mod geometry_resolution {
    use super::*;

    #[test]
    fn test_word_split_across_fragments() {
        let fragments = ["The quan", "tum effect"];
        let index = CanonicalIndex::build(&fragments);
        assert_eq!(index.text(), "the quan tum effect");

        let hits = find_matches(&index, "quantum");
        assert_eq!(hits.len(), 1);
        assert_eq!(
            fragment_runs(&index, hits[0]),
            vec![
                FragmentRun {
                    fragment: 0,
                    start: 4,
                    end: 8
                },
                FragmentRun {
                    fragment: 1,
                    start: 0,
                    end: 3
                },
            ]
        );

        let rects = resolve_geometry(&index, hits[0], &layer(&fragments));
        assert_eq!(
            rects,
            vec![Rect::new(24.0, 100.0, 24.0, 12.0), Rect::new(0.0, 112.0, 18.0, 12.0)]
        );
    }

    #[test]
    fn test_word_wrapped_over_three_spans() {
        let fragments = ["The quan", "tum", " effect"];
        let index = CanonicalIndex::build(&fragments);
        assert_eq!(index.text(), "the quan tum effect");

        let hits = find_matches(&index, "quantum");
        assert_eq!(hits.len(), 1);
        let rects = resolve_geometry(&index, hits[0], &layer(&fragments));
        // last four chars of the first span, then the whole second span
        assert_eq!(
            rects,
            vec![Rect::new(24.0, 100.0, 24.0, 12.0), Rect::new(0.0, 112.0, 18.0, 12.0)]
        );
    }

    #[test]
    fn test_quotes_inside_match_are_covered() {
        let fragments = ["the “attention” layer"];
        let index = CanonicalIndex::build(&fragments);
        let hits = find_matches(&index, "the attention layer");
        assert_eq!(
            fragment_runs(&index, hits[0]),
            vec![FragmentRun {
                fragment: 0,
                start: 0,
                end: 21
            }]
        );
    }

    #[test]
    fn test_zero_area_rects_are_dropped() {
        let frag = MemoryFragment::new("abcdefgh", Point::new(0.0, 0.0), 2.0, 10.0).with_wrap(4);
        let layer = MemoryTextLayer::new(Point::default()).with_fragment(frag);
        let index = CanonicalIndex::build(&["abcdefgh"]);
        let hit = find_matches(&index, "cdef")[0];

        let rects = resolve_geometry(&index, hit, &layer);
        assert_eq!(rects.len(), 2);
        assert!(rects.iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn test_stale_fragment_is_skipped() {
        let fragments = ["The quan", "tum effect"];
        let index = CanonicalIndex::build(&fragments);
        let hit = find_matches(&index, "quantum")[0];

        let mut stale = layer(&fragments);
        stale.detach(1);
        let rects = resolve_geometry(&index, hit, &stale);
        assert_eq!(rects, vec![Rect::new(24.0, 100.0, 24.0, 12.0)]);
    }

    #[test]
    fn test_run_clamped_to_shortened_node() {
        let fragments = ["The quan", "tum effect"];
        let index = CanonicalIndex::build(&fragments);
        let hit = find_matches(&index, "quantum")[0];

        let mut shortened = layer(&fragments);
        shortened.set_node_len(0, 6);
        let rects = resolve_geometry(&index, hit, &shortened);
        assert_eq!(rects[0], Rect::new(24.0, 100.0, 12.0, 12.0));
    }

    #[test]
    fn test_resolve_scaled_is_page_relative() {
        let fragments = ["The quan", "tum effect"];
        let index = CanonicalIndex::build(&fragments);
        let hit = find_matches(&index, "quantum")[0];

        let pos = resolve_scaled(&index, hit, &layer(&fragments), Point::new(0.0, 100.0), 2.0, 4)
            .unwrap()
            .unwrap();
        assert_eq!(pos.page_number(), 4);
        assert_eq!(pos.rects[0].x1, 12.0);
        assert_eq!(pos.rects[0].y1, 0.0);
        assert_eq!(pos.bounding_rect.y2, 12.0);
    }
}
