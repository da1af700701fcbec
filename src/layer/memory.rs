//! In-memory text layers for headless use and tests.
//!
//! [`MemoryTextLayer`] lays every fragment out in a fixed-pitch font, one
//! fragment per line unless told otherwise, and can wrap fragments to
//! simulate line breaks (including the zero-width rectangle browsers report
//! at a wrap). Fragments can be detached or shortened after indexing to
//! exercise the stale-layer paths.

use super::{OverlaySurface, RectMeasurer, TextLayer};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::search::session::{TextSource, Viewer};
use crate::text::TextFragment;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// A fixed-pitch fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFragment {
    /// Text content
    pub text: String,
    /// Viewport position of the first character
    pub origin: Point,
    /// Advance of every character
    pub char_width: f64,
    /// Height of one line
    pub line_height: f64,
    /// Wrap after this many characters
    pub chars_per_line: Option<usize>,
}

impl MemoryFragment {
    /// Create a fragment at `origin`.
    pub fn new(text: impl Into<String>, origin: Point, char_width: f64, line_height: f64) -> Self {
        Self {
            text: text.into(),
            origin,
            char_width,
            line_height,
            chars_per_line: None,
        }
    }

    /// Wrap the fragment every `chars` characters.
    pub fn with_wrap(mut self, chars: usize) -> Self {
        self.chars_per_line = Some(chars.max(1));
        self
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn segment(&self, line: usize, from_col: usize, to_col: usize) -> Rect {
        Rect::new(
            self.origin.x + from_col as f64 * self.char_width,
            self.origin.y + line as f64 * self.line_height,
            (to_col - from_col) as f64 * self.char_width,
            self.line_height,
        )
    }
}

/// A mounted page whose fragments live in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTextLayer {
    page_origin: Point,
    fragments: Vec<MemoryFragment>,
    detached: HashSet<usize>,
    node_lens: HashMap<usize, usize>,
}

impl MemoryTextLayer {
    /// Create an empty layer whose page container sits at `page_origin`.
    pub fn new(page_origin: Point) -> Self {
        Self {
            page_origin,
            ..Default::default()
        }
    }

    /// Lay `texts` out one per line starting at the page origin.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_anchor::geometry::Point;
    /// use pdf_anchor::layer::{MemoryTextLayer, TextLayer};
    ///
    /// let layer = MemoryTextLayer::from_texts(Point::new(0.0, 100.0), &["The quan", "tum"], 6.0, 12.0);
    /// assert_eq!(layer.fragment_count(), 2);
    /// ```
    pub fn from_texts<S: AsRef<str>>(
        page_origin: Point,
        texts: &[S],
        char_width: f64,
        line_height: f64,
    ) -> Self {
        let mut layer = Self::new(page_origin);
        for (i, text) in texts.iter().enumerate() {
            let origin = Point::new(page_origin.x, page_origin.y + i as f64 * line_height);
            layer.push(MemoryFragment::new(text.as_ref(), origin, char_width, line_height));
        }
        layer
    }

    /// Append a fragment.
    pub fn with_fragment(mut self, fragment: MemoryFragment) -> Self {
        self.push(fragment);
        self
    }

    /// Append a fragment in place.
    pub fn push(&mut self, fragment: MemoryFragment) {
        self.fragments.push(fragment);
    }

    /// Detach a fragment's node; measuring it fails afterwards.
    pub fn detach(&mut self, fragment: usize) {
        self.detached.insert(fragment);
    }

    /// Report a different node length than the text suggests.
    pub fn set_node_len(&mut self, fragment: usize, len: usize) {
        self.node_lens.insert(fragment, len);
    }

    fn fragment(&self, fragment: usize) -> Result<&MemoryFragment> {
        self.fragments
            .get(fragment)
            .ok_or(Error::FragmentNotFound(fragment))
    }
}

impl RectMeasurer for MemoryTextLayer {
    fn node_len(&self, fragment: usize) -> Result<usize> {
        let frag = self.fragment(fragment)?;
        if self.detached.contains(&fragment) {
            return Err(Error::Measure {
                fragment,
                reason: "node is detached".to_string(),
            });
        }
        Ok(self
            .node_lens
            .get(&fragment)
            .copied()
            .unwrap_or_else(|| frag.char_len()))
    }

    fn client_rects(&self, fragment: usize, start: usize, end: usize) -> Result<Vec<Rect>> {
        let len = self.node_len(fragment)?;
        let frag = self.fragment(fragment)?;
        if start > end || end > len {
            return Err(Error::Measure {
                fragment,
                reason: format!("range {}..{} outside node of length {}", start, end, len),
            });
        }

        let Some(per_line) = frag.chars_per_line else {
            if start == end {
                return Ok(Vec::new());
            }
            return Ok(vec![frag.segment(0, start, end)]);
        };

        let mut rects = Vec::new();
        let mut pos = start;
        while pos < end {
            let line = pos / per_line;
            let line_start = line * per_line;
            let stop = end.min(line_start + per_line);
            rects.push(frag.segment(line, pos - line_start, stop - line_start));
            if stop < end {
                // Browsers report a zero-width box where the range wraps.
                let col = stop - line_start;
                rects.push(frag.segment(line, col, col));
            }
            pos = stop;
        }
        Ok(rects)
    }
}

impl TextLayer for MemoryTextLayer {
    fn fragments(&self) -> Vec<TextFragment> {
        self.fragments
            .iter()
            .map(|f| TextFragment::new(f.text.clone()))
            .collect()
    }

    fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    fn page_origin(&self) -> Point {
        self.page_origin
    }
}

/// One drawn overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Page the overlay was drawn on
    pub page: u32,
    /// Page-relative rectangle
    pub rect: Rect,
    /// CSS class
    pub class: String,
    /// Fill colour
    pub color: String,
}

/// Records overlays instead of drawing them.
#[derive(Debug, Default)]
pub struct MemorySurface {
    overlays: RefCell<Vec<Overlay>>,
    scrolls: RefCell<Vec<(u32, Rect)>>,
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays currently on the surface.
    pub fn overlays(&self) -> Vec<Overlay> {
        self.overlays.borrow().clone()
    }

    /// Most recent scroll target.
    pub fn last_scroll(&self) -> Option<(u32, Rect)> {
        self.scrolls.borrow().last().copied()
    }
}

impl OverlaySurface for MemorySurface {
    fn clear(&self, class: &str) {
        self.overlays.borrow_mut().retain(|o| o.class != class);
    }

    fn draw(&self, page: u32, rect: Rect, class: &str, color: &str) {
        self.overlays.borrow_mut().push(Overlay {
            page,
            rect,
            class: class.to_string(),
            color: color.to_string(),
        });
    }

    fn scroll_into_view(&self, page: u32, rect: Rect) {
        self.scrolls.borrow_mut().push((page, rect));
    }
}

/// A document whose per-page text is held in memory.
///
/// Pages are 1-based. Extraction calls are counted so callers can observe caching.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    pages: Vec<String>,
    failing: HashSet<u32>,
    extractions: Cell<usize>,
}

impl MemoryDocument {
    /// Create a document from page texts.
    pub fn new<S: Into<String>>(pages: impl IntoIterator<Item = S>) -> Self {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Make extraction of `page` fail.
    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing.insert(page);
        self
    }

    /// Number of `page_text` calls so far.
    pub fn extraction_count(&self) -> usize {
        self.extractions.get()
    }
}

impl TextSource for MemoryDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn page_text(&self, page: u32) -> Result<String> {
        self.extractions.set(self.extractions.get() + 1);
        if self.failing.contains(&page) {
            return Err(Error::Extraction {
                page,
                reason: "extraction failed".to_string(),
            });
        }
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or_else(|| Error::Extraction {
                page,
                reason: "no such page".to_string(),
            })
    }
}

/// A viewer that mounts in-memory layers after a configurable delay.
///
/// After a page change the new page's layer is reported missing for
/// `mount_delay` queries, then mounted. Pages without a layer never mount.
/// Waiting is done on the tokio timer.
#[derive(Debug)]
pub struct MemoryViewer {
    layers: HashMap<u32, MemoryTextLayer>,
    surface: MemorySurface,
    current_page: Cell<u32>,
    mount_delay: usize,
    pending_polls: Cell<usize>,
    page_changes: Cell<usize>,
}

impl MemoryViewer {
    /// Create a viewer showing page 1.
    pub fn new() -> Self {
        Self {
            layers: HashMap::new(),
            surface: MemorySurface::new(),
            current_page: Cell::new(1),
            mount_delay: 0,
            pending_polls: Cell::new(0),
            page_changes: Cell::new(0),
        }
    }

    /// Provide the text layer of `page`.
    pub fn with_layer(mut self, page: u32, layer: MemoryTextLayer) -> Self {
        self.layers.insert(page, layer);
        self
    }

    /// Number of missed queries before a newly shown page mounts.
    pub fn with_mount_delay(mut self, polls: usize) -> Self {
        self.mount_delay = polls;
        self
    }

    /// Surface the viewer draws on.
    pub fn memory_surface(&self) -> &MemorySurface {
        &self.surface
    }

    /// How often the shown page was changed.
    pub fn page_changes(&self) -> usize {
        self.page_changes.get()
    }
}

impl Default for MemoryViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer for MemoryViewer {
    type Layer = MemoryTextLayer;
    type Surface = MemorySurface;

    fn current_page(&self) -> u32 {
        self.current_page.get()
    }

    fn set_current_page(&self, page: u32) {
        self.current_page.set(page);
        self.pending_polls.set(self.mount_delay);
        self.page_changes.set(self.page_changes.get() + 1);
    }

    fn text_layer(&self, page: u32) -> Option<MemoryTextLayer> {
        if page != self.current_page.get() {
            return None;
        }
        let pending = self.pending_polls.get();
        if pending > 0 {
            self.pending_polls.set(pending - 1);
            return None;
        }
        self.layers.get(&page).cloned()
    }

    fn surface(&self) -> &MemorySurface {
        &self.surface
    }

    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
