//! Seams between the search engine and whatever renders the page.
//!
//! A mounted page exposes its text fragments and can measure client
//! rectangles for character ranges of them ([`RectMeasurer`], [`TextLayer`]).
//! Search overlays are drawn onto an [`OverlaySurface`].
//!
//! [`memory`] provides an in-memory fixed-pitch implementation of all three,
//! used for tests and headless callers. The browser implementation lives in
//! `dom` behind the `wasm` feature.

pub mod memory;

#[cfg(target_arch = "wasm32")]
#[cfg(feature = "wasm")]
pub mod dom;

pub use memory::{
    MemoryDocument, MemoryFragment, MemorySurface, MemoryTextLayer, MemoryViewer, Overlay,
};

use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::text::TextFragment;

/// Measures character ranges of rendered text fragments.
///
/// Offsets are character offsets into the fragment text, matching
/// [`CharMapping`](crate::text::CharMapping).
pub trait RectMeasurer {
    /// Current length in characters of the fragment's backing node.
    fn node_len(&self, fragment: usize) -> Result<usize>;

    /// Viewport client rectangles covering characters `start..end` of a fragment.
    fn client_rects(&self, fragment: usize, start: usize, end: usize) -> Result<Vec<Rect>>;
}

/// A mounted page text layer.
pub trait TextLayer: RectMeasurer {
    /// Fragments in rendering order; a fragment's id is its position here.
    fn fragments(&self) -> Vec<TextFragment>;

    /// Number of rendered fragments.
    fn fragment_count(&self) -> usize {
        self.fragments().len()
    }

    /// Viewport offset of the page container.
    fn page_origin(&self) -> Point;
}

/// Where search overlays are drawn.
///
/// Rectangles are page-relative at the current zoom.
pub trait OverlaySurface {
    /// Remove every overlay carrying `class`, on all pages.
    fn clear(&self, class: &str);

    /// Draw one overlay rectangle.
    fn draw(&self, page: u32, rect: Rect, class: &str, color: &str);

    /// Scroll so that `rect` on `page` is visible.
    fn scroll_into_view(&self, page: u32, rect: Rect);
}
