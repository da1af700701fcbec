//! Persisted highlights.
//!
//! A highlight is created either from a user selection (client rectangles
//! reported by the browser) or by anchoring a citation's text on a mounted
//! page. Either way its geometry is stored as a [`ScaledPosition`] and
//! replayed through [`to_screen`](crate::geometry::to_screen) at whatever zoom
//! is active later.

use crate::config::SearchConfig;
use crate::error::Result;
use crate::geometry::{scaled_position, Point, Rect, ScaledPosition};
use crate::layer::TextLayer;
use crate::search::resolver::{fragment_runs, measure_runs, within_fragment_budget};
use crate::search::{candidate_clauses, MatchLocator};
use crate::text::CanonicalIndex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who created a highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Selected by the reader
    User,
    /// Anchored from an assistant citation
    Assistant,
}

/// A stored highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// Unique id
    pub id: String,
    /// Highlighted text as selected or cited
    pub raw_text: String,
    /// Creator
    pub role: Role,
    /// Page number (1-based)
    pub page_number: u32,
    /// Zoom-independent geometry
    pub position: ScaledPosition,
    /// Fill colour
    pub color: String,
}

impl Highlight {
    /// Create a highlight with a fresh id on the position's page.
    pub fn new(
        raw_text: impl Into<String>,
        role: Role,
        position: ScaledPosition,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            raw_text: raw_text.into(),
            role,
            page_number: position.page_number(),
            position,
            color: color.into(),
        }
    }

    /// Page-relative rectangles at the given zoom.
    pub fn screen_rects(&self, scale: f64) -> Result<Vec<Rect>> {
        self.position.screen_rects(scale)
    }

    /// Serialize to the stored JSON shape.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the stored JSON shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Geometry of a user selection.
///
/// `client_rects` are viewport rectangles of the selection, `page_origin` the
/// viewport offset of the page container and `scale` the current zoom.
pub fn capture_selection(
    client_rects: &[Rect],
    page_origin: Point,
    scale: f64,
    page_number: u32,
) -> Result<Option<ScaledPosition>> {
    scaled_position(client_rects, page_origin, scale, page_number)
}

/// Geometry of `text` on a mounted page.
///
/// Ellipsis-separated clauses are anchored separately, each at its first
/// occurrence, and merged into one position. `Ok(None)` when no clause could
/// be located and measured.
pub fn anchor_text<L: TextLayer + ?Sized>(
    layer: &L,
    text: &str,
    scale: f64,
    page_number: u32,
    config: &SearchConfig,
) -> Result<Option<ScaledPosition>> {
    let index = CanonicalIndex::build(&layer.fragments());
    let locator = MatchLocator::from_config(config);

    let mut rects = Vec::new();
    for clause in candidate_clauses(text, config.min_term_chars) {
        let first = locator
            .locate(&index, &clause)
            .into_iter()
            .map(|range| fragment_runs(&index, range))
            .find(|runs| within_fragment_budget(runs, config));
        match first {
            Some(runs) => rects.extend(measure_runs(&runs, layer)),
            None => log::debug!("Clause {:?} not found on page {}", clause, page_number),
        }
    }

    scaled_position(&rects, layer.page_origin(), scale, page_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScaledRect;
    use crate::layer::MemoryTextLayer;

    fn position() -> ScaledPosition {
        ScaledPosition::from_rects(vec![
            ScaledRect::from_corners(10.0, 20.0, 60.0, 30.0, 2),
            ScaledRect::from_corners(10.0, 30.0, 40.0, 40.0, 2),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_takes_page_from_position() {
        let h = Highlight::new("text", Role::User, position(), "#ffeb3b");
        assert_eq!(h.page_number, 2);
        assert!(!h.id.is_empty());
        assert_ne!(h.id, Highlight::new("text", Role::User, position(), "#ffeb3b").id);
    }

    #[test]
    fn test_json_shape() {
        let h = Highlight::new("cited", Role::Assistant, position(), "#90caf9");
        let value: serde_json::Value = serde_json::from_str(&h.to_json().unwrap()).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["rawText"], "cited");
        assert_eq!(value["pageNumber"], 2);
        assert_eq!(value["position"]["boundingRect"]["y2"], 40.0);

        let back = Highlight::from_json(&h.to_json().unwrap()).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Highlight::from_json("{\"id\": 3}").is_err());
    }

    #[test]
    fn test_screen_rects_follow_zoom() {
        let h = Highlight::new("text", Role::User, position(), "yellow");
        let rects = h.screen_rects(2.0).unwrap();
        assert_eq!(rects[0], Rect::new(20.0, 40.0, 100.0, 20.0));
    }

    #[test]
    fn test_anchor_text_merges_clauses() {
        let layer = MemoryTextLayer::from_texts(
            Point::new(50.0, 100.0),
            &["Attention is all you need.", "We propose the Transformer architecture."],
            4.0,
            10.0,
        );
        let pos = anchor_text(
            &layer,
            "Attention is all ... Transformer architecture",
            2.0,
            1,
            &SearchConfig::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(pos.rects.len(), 2);
        // "Attention is all" starts the first line: 16 chars wide
        assert_eq!(pos.rects[0].x1, 0.0);
        assert_eq!(pos.rects[0].x2, 32.0);
        // second line starts at y = 10 viewport px = 5 page units
        assert_eq!(pos.rects[1].y1, 5.0);
        assert_eq!(pos.bounding_rect.y2, 10.0);
    }

    #[test]
    fn test_anchor_text_not_found() {
        let layer = MemoryTextLayer::from_texts(Point::default(), &["nothing here"], 1.0, 1.0);
        let pos = anchor_text(&layer, "missing phrase", 1.0, 1, &SearchConfig::default()).unwrap();
        assert!(pos.is_none());
    }
}
