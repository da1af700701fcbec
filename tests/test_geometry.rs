//! Tests for zoom-independent highlight geometry.

use pdf_anchor::geometry::{scaled_position, to_scaled, to_screen, Point, Rect};
use pdf_anchor::highlight::{capture_selection, Highlight, Role};
use proptest::prelude::*;

const EPS: f64 = 1e-6;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < EPS, "{} != {}", a, b);
}

mod round_trip {
    use super::*;

    #[test]
    fn test_round_trip_at_same_scale() {
        let rect = Rect::new(123.4, 567.8, 91.1, 14.2);
        let scaled = to_scaled(&rect, 1.5, 3).unwrap();
        assert_eq!(scaled.page_number, 3);

        let back = to_screen(&scaled, 1.5).unwrap();
        assert_close(back.left(), rect.left());
        assert_close(back.top(), rect.top());
        assert_close(back.right(), rect.right());
        assert_close(back.bottom(), rect.bottom());
    }

    #[test]
    fn test_other_zoom_scales_proportionally() {
        let rect = Rect::new(30.0, 45.0, 60.0, 15.0);
        let scaled = to_scaled(&rect, 1.5, 1).unwrap();
        let zoomed = to_screen(&scaled, 2.0).unwrap();
        let ratio = 2.0 / 1.5;
        assert_close(zoomed.x, rect.x * ratio);
        assert_close(zoomed.y, rect.y * ratio);
        assert_close(zoomed.width, rect.width * ratio);
        assert_close(zoomed.height, rect.height * ratio);
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_any_scale(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            w in 0.1f64..500.0,
            h in 0.1f64..500.0,
            scale in 0.25f64..4.0,
        ) {
            let rect = Rect::new(x, y, w, h);
            let back = to_screen(&to_scaled(&rect, scale, 1).unwrap(), scale).unwrap();
            prop_assert!((back.left() - rect.left()).abs() < EPS);
            prop_assert!((back.top() - rect.top()).abs() < EPS);
            prop_assert!((back.right() - rect.right()).abs() < EPS);
            prop_assert!((back.bottom() - rect.bottom()).abs() < EPS);
        }
    }
}

mod positions {
    use super::*;

    #[test]
    fn test_zero_area_rects_never_persisted() {
        let rects = [
            Rect::new(10.0, 10.0, 0.0, 12.0),
            Rect::new(10.0, 10.0, 20.0, 0.0),
        ];
        assert!(scaled_position(&rects, Point::default(), 1.0, 1).unwrap().is_none());
    }

    #[test]
    fn test_capture_selection_is_page_relative() {
        let rects = [Rect::new(150.0, 260.0, 90.0, 15.0)];
        let pos = capture_selection(&rects, Point::new(100.0, 200.0), 1.5, 2)
            .unwrap()
            .unwrap();
        assert_close(pos.rects[0].x1, 50.0 / 1.5);
        assert_close(pos.rects[0].y1, 40.0);
        assert_eq!(pos.page_number(), 2);
    }

    #[test]
    fn test_stored_highlight_replays_at_new_zoom() {
        let rects = [Rect::new(40.0, 40.0, 80.0, 20.0)];
        let pos = capture_selection(&rects, Point::default(), 2.0, 5)
            .unwrap()
            .unwrap();
        let stored = Highlight::new("a selection", Role::User, pos, "#ffeb3b")
            .to_json()
            .unwrap();

        let restored = Highlight::from_json(&stored).unwrap();
        assert_eq!(restored.page_number, 5);
        assert_eq!(restored.screen_rects(1.0).unwrap(), vec![Rect::new(20.0, 20.0, 40.0, 10.0)]);
    }
}
