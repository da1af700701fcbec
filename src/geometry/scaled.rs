//! Zoom-independent highlight geometry.
//!
//! Client rectangles depend on the zoom factor that was active when they were
//! measured. Before storage they are made page-relative and divided by that
//! factor; when replayed they are multiplied by whatever factor is active then.
//! Width and height are always derived from the corners so the two never drift.

use super::{Point, Rect};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A rectangle in page units at zoom 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledRect {
    /// Left edge
    pub x1: f64,
    /// Top edge
    pub y1: f64,
    /// Right edge
    pub x2: f64,
    /// Bottom edge
    pub y2: f64,
    /// `x2 - x1`
    pub width: f64,
    /// `y2 - y1`
    pub height: f64,
    /// Page number (1-based)
    pub page_number: u32,
}

impl ScaledRect {
    /// Build from corners; width and height follow from them.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64, page_number: u32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            width: x2 - x1,
            height: y2 - y1,
            page_number,
        }
    }

    /// Smallest rectangle containing both.
    pub fn envelope(&self, other: &ScaledRect) -> ScaledRect {
        ScaledRect::from_corners(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
            self.page_number,
        )
    }
}

/// Persisted geometry of one highlight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledPosition {
    /// Min/max envelope of `rects`
    pub bounding_rect: ScaledRect,
    /// One rectangle per measured line piece
    pub rects: Vec<ScaledRect>,
}

impl ScaledPosition {
    /// Wrap `rects` with their bounding envelope. `None` when `rects` is empty.
    pub fn from_rects(rects: Vec<ScaledRect>) -> Option<Self> {
        let (first, rest) = rects.split_first()?;
        let bounding_rect = rest.iter().fold(*first, |acc, r| acc.envelope(r));
        Some(Self {
            bounding_rect,
            rects,
        })
    }

    /// Page the highlight lives on.
    pub fn page_number(&self) -> u32 {
        self.bounding_rect.page_number
    }

    /// Screen rectangles at the given zoom.
    pub fn screen_rects(&self, scale: f64) -> Result<Vec<Rect>> {
        self.rects.iter().map(|r| to_screen(r, scale)).collect()
    }
}

fn check_scale(scale: f64) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScale(scale))
    }
}

/// Convert a page-relative client rectangle measured at `scale` to page units.
///
/// # Examples
///
/// ```
/// use pdf_anchor::geometry::{to_scaled, Rect};
///
/// let scaled = to_scaled(&Rect::new(30.0, 60.0, 15.0, 6.0), 1.5, 3).unwrap();
/// assert_eq!(scaled.x1, 20.0);
/// assert_eq!(scaled.y2, 44.0);
/// assert_eq!(scaled.page_number, 3);
/// ```
pub fn to_scaled(rect: &Rect, scale: f64, page_number: u32) -> Result<ScaledRect> {
    check_scale(scale)?;
    Ok(ScaledRect::from_corners(
        rect.left() / scale,
        rect.top() / scale,
        rect.right() / scale,
        rect.bottom() / scale,
        page_number,
    ))
}

/// Convert stored page units back to a page-relative rectangle at `scale`.
pub fn to_screen(rect: &ScaledRect, scale: f64) -> Result<Rect> {
    check_scale(scale)?;
    Ok(Rect::from_points(
        rect.x1 * scale,
        rect.y1 * scale,
        rect.x2 * scale,
        rect.y2 * scale,
    ))
}

/// Turn viewport client rectangles into a persisted position.
///
/// `page_origin` is the viewport offset of the page container. Empty
/// rectangles are dropped; `Ok(None)` means nothing with area was left.
pub fn scaled_position(
    rects: &[Rect],
    page_origin: Point,
    scale: f64,
    page_number: u32,
) -> Result<Option<ScaledPosition>> {
    let scaled = rects
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| to_scaled(&r.relative_to(page_origin), scale, page_number))
        .collect::<Result<Vec<_>>>()?;
    Ok(ScaledPosition::from_rects(scaled))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_to_scaled_divides_corners() {
        let r = to_scaled(&Rect::new(10.0, 20.0, 30.0, 40.0), 2.0, 1).unwrap();
        assert_eq!((r.x1, r.y1, r.x2, r.y2), (5.0, 10.0, 20.0, 30.0));
        assert_eq!((r.width, r.height), (15.0, 20.0));
    }

    #[test]
    fn test_to_screen_multiplies_corners() {
        let r = to_screen(&ScaledRect::from_corners(5.0, 10.0, 20.0, 30.0, 1), 3.0).unwrap();
        assert_eq!(r, Rect::new(15.0, 30.0, 45.0, 60.0));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(to_scaled(&rect, 0.0, 1), Err(Error::InvalidScale(_))));
        assert!(matches!(to_scaled(&rect, -1.0, 1), Err(Error::InvalidScale(_))));
        assert!(to_scaled(&rect, f64::NAN, 1).is_err());
        let unit = ScaledRect::from_corners(0.0, 0.0, 1.0, 1.0, 1);
        assert!(to_screen(&unit, f64::INFINITY).is_err());
    }

    #[test]
    fn test_envelope() {
        let a = ScaledRect::from_corners(0.0, 10.0, 50.0, 20.0, 2);
        let b = ScaledRect::from_corners(5.0, 22.0, 30.0, 32.0, 2);
        let env = a.envelope(&b);
        assert_eq!((env.x1, env.y1, env.x2, env.y2), (0.0, 10.0, 50.0, 32.0));
        assert_eq!(env.height, 22.0);
    }

    #[test]
    fn test_scaled_position_drops_empty_rects() {
        let rects = [
            Rect::new(110.0, 220.0, 40.0, 10.0),
            Rect::new(150.0, 220.0, 0.0, 10.0),
            Rect::new(100.0, 232.0, 20.0, 10.0),
        ];
        let pos = scaled_position(&rects, Point::new(100.0, 200.0), 2.0, 4)
            .unwrap()
            .unwrap();

        assert_eq!(pos.rects.len(), 2);
        assert_eq!(pos.page_number(), 4);
        let b = pos.bounding_rect;
        assert!((b.x1 - 0.0).abs() < EPS);
        assert!((b.y1 - 10.0).abs() < EPS);
        assert!((b.x2 - 25.0).abs() < EPS);
        assert!((b.y2 - 21.0).abs() < EPS);
    }

    #[test]
    fn test_scaled_position_all_empty() {
        let rects = [Rect::new(1.0, 1.0, 0.0, 0.0)];
        assert!(scaled_position(&rects, Point::default(), 1.0, 1).unwrap().is_none());
    }

    #[test]
    fn test_position_json_shape() {
        let pos = ScaledPosition::from_rects(vec![ScaledRect::from_corners(1.0, 2.0, 3.0, 4.0, 9)])
            .unwrap();
        let json = serde_json::to_value(&pos).unwrap();
        assert_eq!(json["boundingRect"]["pageNumber"], 9);
        assert_eq!(json["rects"][0]["x2"], 3.0);
    }
}
