//! Locating search terms and citations in rendered pages.
//!
//! The pipeline for one page is:
//! 1. [`CanonicalIndex::build`](crate::text::CanonicalIndex::build) over the
//!    page's text fragments,
//! 2. [`find_matches`] / [`MatchLocator::locate`] for canonical match ranges,
//! 3. [`resolve_geometry`] (or [`resolve_scaled`]) for rectangles.
//!
//! [`SearchSession`] runs this across a whole document: a coarse pass over
//! extracted page text finds the pages, then the target page is mounted and
//! highlighted.
//!
//! ## Example
//!
//! ```
//! use pdf_anchor::geometry::Point;
//! use pdf_anchor::layer::MemoryTextLayer;
//! use pdf_anchor::search::{find_matches, resolve_geometry};
//! use pdf_anchor::text::CanonicalIndex;
//!
//! let layer = MemoryTextLayer::from_texts(Point::default(), &["The quan", "tum", " effect"], 6.0, 12.0);
//! let index = CanonicalIndex::build(&["The quan", "tum", " effect"]);
//!
//! let matches = find_matches(&index, "quantum");
//! assert_eq!(matches.len(), 1);
//!
//! let rects = resolve_geometry(&index, matches[0], &layer);
//! assert_eq!(rects.len(), 2);
//! ```

pub mod clauses;
pub mod locator;
pub mod resolver;
pub mod session;

pub use clauses::{candidate_clauses, split_clauses};
pub use locator::{find_canonical, find_matches, MatchLocator, MatchRange};
pub use resolver::{
    fragment_runs, measure_runs, paint_matches, resolve_geometry, resolve_scaled, FragmentRun,
};
pub use session::{
    page_order, poll_budget, NavigationOutcome, PageHit, SearchSession, SearchState, TextSource,
    Viewer,
};
