//! Text canonicalization and the per-page canonical index.

pub mod canonical;
pub mod index;

pub use canonical::{canonicalize, expand_macros};
pub use index::{CanonicalIndex, CharMapping, TextFragment};
