//! 2D affine transforms.
//!
//! An [`AffineTransform`] maps `p' = M·p + t` with
//!
//! ```text
//! x' = xx·x + xy·y + tx
//! y' = yx·x + yy·y + ty
//! ```
//!
//! Composition is explicit: [`AffineTransform::compose`]`(a, b)` is `a ∘ b`,
//! i.e. `b` is applied first. `a * b` is the same thing.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::DETERMINANT_EPSILON;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("transform is not invertible (determinant {determinant})")]
    NotInvertible { determinant: f64 },
    #[error("matrix is not affine")]
    NotAffine,
}

/// Immutable 2D affine transform value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub xx: f64,
    pub xy: f64,
    pub yx: f64,
    pub yy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    #[must_use]
    pub const fn new(xx: f64, xy: f64, yx: f64, yy: f64, tx: f64, ty: f64) -> Self {
        Self { xx, xy, yx, yy, tx, ty }
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[must_use]
    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    /// Counter-clockwise rotation by `theta` radians (Y-up) about `about`.
    #[must_use]
    pub fn rotate(theta: f64, about: Point) -> Self {
        let (s, c) = theta.sin_cos();
        Self::about(Self::new(c, -s, s, c, 0.0, 0.0), about)
    }

    /// Axis-aligned scale by `(sx, sy)` keeping `about` fixed.
    #[must_use]
    pub fn scale(sx: f64, sy: f64, about: Point) -> Self {
        Self::about(Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0), about)
    }

    /// Conjugate a linear map so that `pivot` is its fixed point.
    fn about(linear: Self, pivot: Point) -> Self {
        let moved = linear.map_vector(pivot);
        Self { tx: pivot.x - moved.x, ty: pivot.y - moved.y, ..linear }
    }

    /// `a ∘ b`: apply `b`, then `a`.
    #[must_use]
    pub fn compose(a: Self, b: Self) -> Self {
        Self {
            xx: a.xx * b.xx + a.xy * b.yx,
            xy: a.xx * b.xy + a.xy * b.yy,
            yx: a.yx * b.xx + a.yy * b.yx,
            yy: a.yx * b.xy + a.yy * b.yy,
            tx: a.xx * b.tx + a.xy * b.ty + a.tx,
            ty: a.yx * b.tx + a.yy * b.ty + a.ty,
        }
    }

    /// Determinant of the linear part.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.xx * self.yy - self.xy * self.yx
    }

    /// # Errors
    ///
    /// Returns `NotInvertible` when the linear part's determinant is ~0 or not finite.
    pub fn invert(&self) -> Result<Self, TransformError> {
        let determinant = self.determinant();
        if !determinant.is_finite() || determinant.abs() < DETERMINANT_EPSILON {
            return Err(TransformError::NotInvertible { determinant });
        }
        let inv = 1.0 / determinant;
        let linear = Self::new(self.yy * inv, -self.xy * inv, -self.yx * inv, self.xx * inv, 0.0, 0.0);
        let t = linear.map_vector(Point::new(self.tx, self.ty));
        Ok(Self { tx: -t.x, ty: -t.y, ..linear })
    }

    #[must_use]
    pub fn map_point(&self, p: Point) -> Point {
        Point {
            x: self.xx * p.x + self.xy * p.y + self.tx,
            y: self.yx * p.x + self.yy * p.y + self.ty,
        }
    }

    /// Apply only the linear part (vectors ignore translation).
    #[must_use]
    pub fn map_vector(&self, v: Point) -> Point {
        Point {
            x: self.xx * v.x + self.xy * v.y,
            y: self.yx * v.x + self.yy * v.y,
        }
    }

    /// Always true for the six-coefficient form. Matrices coming from outside
    /// go through [`Self::from_matrix3`], which is where projective input is rejected.
    #[must_use]
    pub fn is_affine(&self) -> bool {
        true
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.xx, self.xy, self.yx, self.yy, self.tx, self.ty]
            .iter()
            .all(|c| c.is_finite())
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Coefficient-wise comparison within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let a = [self.xx, self.xy, self.yx, self.yy, self.tx, self.ty];
        let b = [other.xx, other.xy, other.yx, other.yy, other.tx, other.ty];
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
    }

    /// Build from a row-major 3×3 homogeneous matrix.
    ///
    /// # Errors
    ///
    /// Returns `NotAffine` if the bottom row is not `(0, 0, 1)` or any entry is not finite.
    pub fn from_matrix3(m: [[f64; 3]; 3]) -> Result<Self, TransformError> {
        if m.iter().flatten().any(|c| !c.is_finite()) || m[2] != [0.0, 0.0, 1.0] {
            return Err(TransformError::NotAffine);
        }
        Ok(Self::new(m[0][0], m[0][1], m[1][0], m[1][1], m[0][2], m[1][2]))
    }

    /// Row-major 3×3 homogeneous matrix.
    #[must_use]
    pub fn to_matrix3(&self) -> [[f64; 3]; 3] {
        [[self.xx, self.xy, self.tx], [self.yx, self.yy, self.ty], [0.0, 0.0, 1.0]]
    }

    /// Convert for the raster backend.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn to_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.xx as f32,
            self.yx as f32,
            self.xy as f32,
            self.yy as f32,
            self.tx as f32,
            self.ty as f32,
        )
    }
}

impl Mul for AffineTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::compose(self, rhs)
    }
}
