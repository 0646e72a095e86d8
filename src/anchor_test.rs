use super::*;

fn bbox() -> BoundingBox {
    BoundingBox::new(Point::new(0.0, 0.0), Point::new(10.0, 20.0))
}

// =============================================================
// resolve_anchor
// =============================================================

#[test]
fn origin_ignores_box() {
    assert_eq!(resolve_anchor(AnchorMode::Origin, &bbox(), Point::new(5.0, 5.0)), Point::ORIGIN);
}

#[test]
fn center_is_box_midpoint() {
    assert_eq!(resolve_anchor(AnchorMode::Center, &bbox(), Point::ORIGIN), Point::new(5.0, 10.0));
}

#[test]
fn top_is_max_y_on_the_y_up_canvas() {
    assert_eq!(resolve_anchor(AnchorMode::TopLeft, &bbox(), Point::ORIGIN), Point::new(0.0, 20.0));
    assert_eq!(resolve_anchor(AnchorMode::TopRight, &bbox(), Point::ORIGIN), Point::new(10.0, 20.0));
}

#[test]
fn bottom_is_min_y_on_the_y_up_canvas() {
    assert_eq!(resolve_anchor(AnchorMode::BottomRight, &bbox(), Point::ORIGIN), Point::new(10.0, 0.0));
    assert_eq!(resolve_anchor(AnchorMode::BottomLeft, &bbox(), Point::ORIGIN), Point::new(0.0, 0.0));
}

#[test]
fn custom_uses_supplied_point() {
    let custom = Point::new(-3.0, 7.5);
    assert_eq!(resolve_anchor(AnchorMode::Custom, &bbox(), custom), custom);
}

#[test]
fn corners_of_offset_box() {
    let b = BoundingBox::new(Point::new(-4.0, 2.0), Point::new(6.0, -8.0));
    assert_eq!(resolve_anchor(AnchorMode::TopLeft, &b, Point::ORIGIN), Point::new(-4.0, 2.0));
    assert_eq!(resolve_anchor(AnchorMode::BottomRight, &b, Point::ORIGIN), Point::new(6.0, -8.0));
}

// =============================================================
// AnchorMode
// =============================================================

#[test]
fn default_is_origin() {
    assert_eq!(AnchorMode::default(), AnchorMode::Origin);
}

#[test]
fn labels_roundtrip() {
    let modes = [
        AnchorMode::Origin,
        AnchorMode::TopLeft,
        AnchorMode::TopRight,
        AnchorMode::BottomRight,
        AnchorMode::BottomLeft,
        AnchorMode::Custom,
        AnchorMode::Center,
    ];
    for mode in modes {
        assert_eq!(AnchorMode::from_label(mode.label()), Some(mode));
    }
}

#[test]
fn unknown_label_is_none() {
    assert_eq!(AnchorMode::from_label("Middle"), None);
}

#[test]
fn serde_uses_snake_case() {
    assert_eq!(serde_json::to_string(&AnchorMode::TopLeft).unwrap(), "\"top_left\"");
    let mode: AnchorMode = serde_json::from_str("\"bottom_right\"").unwrap();
    assert_eq!(mode, AnchorMode::BottomRight);
}
