//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Determinants below this magnitude are treated as singular.
pub const DETERMINANT_EPSILON: f64 = 1e-12;

/// Gesture vectors shorter than this (squared, canvas units) have no direction.
pub const DEGENERATE_LENGTH_SQUARED: f64 = 1e-18;

// ── Guides ──────────────────────────────────────────────────────

/// Half-length of the axis guides in canvas units; long enough to cross any viewport.
pub const AXIS_EXTENT: f64 = 9999.0;

/// Stroke width of guide and selection lines in screen pixels.
pub const GUIDE_STROKE_PX: f32 = 1.0;

// ── Colours (RGBA) ──────────────────────────────────────────────

pub const AXIS_COLOR: [u8; 4] = [128, 128, 128, 255];
pub const SELECTION_COLOR: [u8; 4] = [0, 0, 0, 255];
pub const LOCAL_AXIS_COLOR: [u8; 4] = [160, 160, 160, 255];
