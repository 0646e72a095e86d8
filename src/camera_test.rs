#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_arithmetic() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(4.0, 6.0);
    assert_eq!(b - a, Point::new(3.0, 4.0));
    assert_eq!(a + b, Point::new(5.0, 8.0));
    assert_eq!(-a, Point::new(-1.0, -2.0));
    assert_eq!(a * 2.0, Point::new(2.0, 4.0));
}

#[test]
fn point_dot_and_length() {
    let v = Point::new(3.0, 4.0);
    assert_eq!(v.dot(Point::new(1.0, 0.0)), 3.0);
    assert_eq!(v.length_squared(), 25.0);
    assert_eq!(v.length(), 5.0);
}

#[test]
fn point_angle_quadrants() {
    assert!(approx_eq(Point::new(1.0, 0.0).angle(), 0.0));
    assert!(approx_eq(Point::new(0.0, 1.0).angle(), std::f64::consts::FRAC_PI_2));
    assert!(approx_eq(Point::new(-1.0, 0.0).angle(), std::f64::consts::PI));
}

#[test]
fn point_is_finite() {
    assert!(Point::new(1.0, 2.0).is_finite());
    assert!(!Point::new(f64::NAN, 2.0).is_finite());
    assert!(!Point::new(1.0, f64::INFINITY).is_finite());
}

// =============================================================
// Camera
// =============================================================

#[test]
fn camera_default_has_unit_magnification() {
    let cam = Camera::default();
    assert_eq!(cam.magnification, 1.0);
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
}

#[test]
fn viewport_centre_is_canvas_origin() {
    let cam = Camera::new(200.0, 100.0);
    assert!(point_approx_eq(cam.screen_to_canvas(Point::new(100.0, 50.0)), Point::ORIGIN));
}

#[test]
fn screen_down_is_canvas_down() {
    let cam = Camera::new(200.0, 100.0);
    // 10px below the centre on screen is y = -10 on the Y-up canvas.
    let p = cam.screen_to_canvas(Point::new(100.0, 60.0));
    assert!(point_approx_eq(p, Point::new(0.0, -10.0)));
}

#[test]
fn screen_to_canvas_with_magnification() {
    let cam = Camera { magnification: 2.0, ..Camera::new(200.0, 100.0) };
    let p = cam.screen_to_canvas(Point::new(120.0, 30.0));
    assert!(point_approx_eq(p, Point::new(10.0, 10.0)));
}

#[test]
fn screen_to_canvas_with_pan() {
    let mut cam = Camera::new(200.0, 100.0);
    cam.pan_by(20.0, -10.0);
    assert!(point_approx_eq(cam.screen_to_canvas(Point::new(120.0, 40.0)), Point::ORIGIN));
}

#[test]
fn canvas_to_screen_roundtrip() {
    let cam = Camera { pan_x: 7.0, pan_y: -3.0, magnification: 1.5, viewport_width: 640.0, viewport_height: 480.0 };
    for p in [Point::new(0.0, 0.0), Point::new(12.5, -8.0), Point::new(-100.0, 42.0)] {
        assert!(point_approx_eq(cam.screen_to_canvas(cam.canvas_to_screen(p)), p));
    }
}

#[test]
fn to_transform_matches_canvas_to_screen() {
    let cam = Camera { pan_x: 5.0, pan_y: 9.0, magnification: 3.0, viewport_width: 300.0, viewport_height: 200.0 };
    let t = cam.to_transform();
    for p in [Point::new(1.0, 2.0), Point::new(-4.0, 0.5)] {
        assert!(point_approx_eq(t.map_point(p), cam.canvas_to_screen(p)));
    }
}
