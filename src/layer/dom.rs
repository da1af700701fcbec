//! Browser text layers over DOM `Text` nodes.
//!
//! Fragment offsets are character offsets; DOM ranges count UTF-16 code
//! units, so offsets are converted against the node's current data before
//! every range is built.
//!
//! The host application implements [`Viewer`](crate::search::Viewer) on top
//! of these, including `wait` on the browser's own timer.

use super::{OverlaySurface, RectMeasurer, TextLayer};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::text::TextFragment;
use std::collections::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Text};

fn measure_err(fragment: usize) -> impl Fn(JsValue) -> Error {
    move |value| Error::Measure {
        fragment,
        reason: format!("{:?}", value),
    }
}

fn utf16_offset(data: &str, chars: usize) -> u32 {
    data.chars().take(chars).map(char::len_utf16).sum::<usize>() as u32
}

/// A mounted page text layer in the document.
pub struct DomTextLayer {
    document: Document,
    page_container: Element,
    nodes: Vec<Text>,
}

impl DomTextLayer {
    /// Collect the text nodes of `text_layer` in document order.
    ///
    /// Every `span` whose first child is a text node becomes one fragment.
    pub fn from_element(
        document: Document,
        page_container: Element,
        text_layer: &Element,
    ) -> Result<Self> {
        let spans = text_layer
            .query_selector_all("span")
            .map_err(measure_err(0))?;

        let mut nodes = Vec::new();
        for i in 0..spans.length() {
            let Some(child) = spans.item(i).and_then(|span| span.first_child()) else {
                continue;
            };
            if let Ok(text) = child.dyn_into::<Text>() {
                nodes.push(text);
            }
        }

        Ok(Self {
            document,
            page_container,
            nodes,
        })
    }

    fn node(&self, fragment: usize) -> Result<&Text> {
        self.nodes
            .get(fragment)
            .ok_or(Error::FragmentNotFound(fragment))
    }
}

impl RectMeasurer for DomTextLayer {
    fn node_len(&self, fragment: usize) -> Result<usize> {
        let node = self.node(fragment)?;
        if !node.is_connected() {
            return Err(Error::Measure {
                fragment,
                reason: "node is detached".to_string(),
            });
        }
        Ok(node.data().chars().count())
    }

    fn client_rects(&self, fragment: usize, start: usize, end: usize) -> Result<Vec<Rect>> {
        let node = self.node(fragment)?;
        let data = node.data();

        let range = self.document.create_range().map_err(measure_err(fragment))?;
        range
            .set_start(node, utf16_offset(&data, start))
            .map_err(measure_err(fragment))?;
        range
            .set_end(node, utf16_offset(&data, end))
            .map_err(measure_err(fragment))?;

        let Some(list) = range.get_client_rects() else {
            return Ok(Vec::new());
        };
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .map(|r| Rect::new(r.x(), r.y(), r.width(), r.height()))
            .collect())
    }
}

impl TextLayer for DomTextLayer {
    fn fragments(&self) -> Vec<TextFragment> {
        self.nodes.iter().map(|n| TextFragment::new(n.data())).collect()
    }

    fn fragment_count(&self) -> usize {
        self.nodes.len()
    }

    fn page_origin(&self) -> Point {
        let r = self.page_container.get_bounding_client_rect();
        Point::new(r.x(), r.y())
    }
}

/// Draws overlays as absolutely positioned `div`s inside page containers.
pub struct DomOverlaySurface {
    document: Document,
    pages: HashMap<u32, Element>,
    scroll_anchor_class: String,
}

impl DomOverlaySurface {
    /// Create a surface with no registered pages.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            pages: HashMap::new(),
            scroll_anchor_class: "search-scroll-anchor".to_string(),
        }
    }

    /// Register the container element of `page`.
    pub fn set_page_container(&mut self, page: u32, container: Element) {
        self.pages.insert(page, container);
    }

    fn place(
        &self,
        page: u32,
        rect: Rect,
        class: &str,
        color: Option<&str>,
    ) -> std::result::Result<HtmlElement, JsValue> {
        let container = self
            .pages
            .get(&page)
            .ok_or_else(|| JsValue::from_str(&format!("no container for page {}", page)))?;

        let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
        el.set_class_name(class);
        let style = el.style();
        style.set_property("position", "absolute")?;
        style.set_property("left", &format!("{}px", rect.x))?;
        style.set_property("top", &format!("{}px", rect.y))?;
        style.set_property("width", &format!("{}px", rect.width))?;
        style.set_property("height", &format!("{}px", rect.height))?;
        style.set_property("pointer-events", "none")?;
        if let Some(color) = color {
            style.set_property("background-color", color)?;
        }
        container.append_child(&el)?;
        Ok(el)
    }
}

impl OverlaySurface for DomOverlaySurface {
    fn clear(&self, class: &str) {
        let Ok(found) = self.document.query_selector_all(&format!(".{}", class)) else {
            log::warn!("Invalid overlay class {:?}", class);
            return;
        };
        for i in 0..found.length() {
            if let Some(el) = found.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                el.remove();
            }
        }
    }

    fn draw(&self, page: u32, rect: Rect, class: &str, color: &str) {
        if let Err(e) = self.place(page, rect, class, Some(color)) {
            log::warn!("Failed to draw overlay on page {}: {:?}", page, e);
        }
    }

    fn scroll_into_view(&self, page: u32, rect: Rect) {
        self.clear(&self.scroll_anchor_class);
        match self.place(page, rect, &self.scroll_anchor_class, None) {
            Ok(anchor) => anchor.scroll_into_view(),
            Err(e) => log::warn!("Failed to scroll to page {}: {:?}", page, e),
        }
    }
}
