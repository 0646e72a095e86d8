//! Points and the canvas camera.
//!
//! Canvas space is Y-up with the origin at the centre of the viewport. Screen
//! space is the presentation layer's pixel grid: Y-down, origin at the top-left
//! corner. The camera owns the conversion between the two, including the
//! magnification and the pan offset.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::transform::AffineTransform;

/// A point (or vector) in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Dot product, treating both points as vectors from the origin.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Angle of the vector from the positive X axis, in radians.
    #[must_use]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Camera state for the Y-flipped canvas view.
///
/// `pan_x` / `pan_y` are in screen pixels and move the canvas origin away from
/// the viewport centre. `magnification` is a scale factor (1.0 = one canvas
/// unit per pixel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub magnification: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, magnification: 1.0, viewport_width: 0.0, viewport_height: 0.0 }
    }
}

impl Camera {
    /// A camera centred in a viewport of the given pixel size.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self { viewport_width, viewport_height, ..Self::default() }
    }

    /// Screen position of the canvas origin.
    #[must_use]
    pub fn origin_on_screen(&self) -> Point {
        Point::new(self.viewport_width * 0.5 + self.pan_x, self.viewport_height * 0.5 + self.pan_y)
    }

    /// Convert a screen-space point (pixels, Y-down) to canvas coordinates (Y-up).
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        let origin = self.origin_on_screen();
        Point {
            x: (screen.x - origin.x) / self.magnification,
            y: -(screen.y - origin.y) / self.magnification,
        }
    }

    /// Convert a canvas-space point to screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        let origin = self.origin_on_screen();
        Point {
            x: canvas.x * self.magnification + origin.x,
            y: -canvas.y * self.magnification + origin.y,
        }
    }

    /// The canvas → screen mapping as an affine transform.
    #[must_use]
    pub fn to_transform(&self) -> AffineTransform {
        let origin = self.origin_on_screen();
        AffineTransform::new(self.magnification, 0.0, 0.0, -self.magnification, origin.x, origin.y)
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}
