// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Anchor
//!
//! Text search and highlight positioning for rendered PDF pages.
//!
//! A PDF text layer is a sequence of positioned fragments that rarely line up
//! with words or sentences, and search phrases (typed, or lifted from an AI
//! citation) often spell things differently from the renderer: LaTeX macros,
//! Greek letters, ligatures, curly quotes. This crate finds such phrases
//! anyway and turns the hits into rectangles.
//!
//! ## Core Features
//!
//! - **Canonical text**: ligature, Greek, math-symbol and macro expansion,
//!   quote removal, punctuation folding ([`text::canonical`])
//! - **Position fidelity**: a per-character mapping from canonical text back to
//!   fragment offsets ([`text::CanonicalIndex`])
//! - **Fuzzy matching**: exact substring search with a whitespace-insensitive
//!   fallback ([`search::find_matches`])
//! - **Geometry**: run coalescing and rectangle measurement through a narrow
//!   [`layer::RectMeasurer`] seam ([`search::resolve_geometry`])
//! - **Cross-page search**: ellipsis clause splitting, extraction-based page
//!   search, bounded wait for the target page ([`search::SearchSession`])
//! - **Persisted highlights**: zoom-independent geometry that replays at any
//!   scale ([`geometry::scaled`], [`highlight`])
//!
//! ## Quick Start
//!
//! ```
//! use pdf_anchor::geometry::{to_scaled, to_screen, Point};
//! use pdf_anchor::layer::MemoryTextLayer;
//! use pdf_anchor::search::{find_matches, resolve_geometry};
//! use pdf_anchor::text::CanonicalIndex;
//!
//! let fragments = ["We use the eﬃcient", "“attention” mechanism."];
//! let layer = MemoryTextLayer::from_texts(Point::default(), &fragments, 5.0, 12.0);
//! let index = CanonicalIndex::build(&fragments);
//!
//! let hit = find_matches(&index, "efficient \"attention\"")[0];
//! let rects = resolve_geometry(&index, hit, &layer);
//! assert_eq!(rects.len(), 2);
//!
//! let stored = to_scaled(&rects[0], 1.5, 1).unwrap();
//! let replayed = to_screen(&stored, 1.5).unwrap();
//! assert!((replayed.x - rects[0].x).abs() < 1e-9);
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry and the persisted highlight codec
pub mod geometry;

// Canonical text and page index
pub mod text;

// Text layer seams and implementations
pub mod layer;

// Matching, geometry resolution, cross-page sessions
pub mod search;

// Persisted highlights
pub mod highlight;

// Re-exports
pub use config::SearchConfig;
pub use error::{Error, Result};
pub use highlight::{Highlight, Role};
pub use search::{SearchSession, SearchState};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
