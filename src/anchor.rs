//! Anchor resolution: which canvas point rotate/scale gestures pivot around.
//!
//! Canvas space is Y-up, so the visual top of a box is its maximum-Y edge.
//! `TopLeft` therefore resolves to `(min_x, max_y)`. Hit testing works in the
//! same space, so what the user clicks and what the anchor names agree.

#[cfg(test)]
#[path = "anchor_test.rs"]
mod anchor_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::drawable::BoundingBox;

/// Where a gesture's anchor sits relative to the selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// Canvas origin `(0, 0)`.
    #[default]
    Origin,
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    /// A caller-supplied point.
    Custom,
    Center,
}

impl AnchorMode {
    /// Parse the label shown in the anchor picker (`"Top Left"`, `"Center"`, ...).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Origin" => Some(Self::Origin),
            "Top Left" => Some(Self::TopLeft),
            "Top Right" => Some(Self::TopRight),
            "Bottom Right" => Some(Self::BottomRight),
            "Bottom Left" => Some(Self::BottomLeft),
            "Custom" => Some(Self::Custom),
            "Center" => Some(Self::Center),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Origin => "Origin",
            Self::TopLeft => "Top Left",
            Self::TopRight => "Top Right",
            Self::BottomRight => "Bottom Right",
            Self::BottomLeft => "Bottom Left",
            Self::Custom => "Custom",
            Self::Center => "Center",
        }
    }
}

/// Resolve `mode` against a canvas-space bounding box.
///
/// `custom` is only consulted for [`AnchorMode::Custom`].
#[must_use]
pub fn resolve_anchor(mode: AnchorMode, bbox: &BoundingBox, custom: Point) -> Point {
    match mode {
        AnchorMode::Origin => Point::ORIGIN,
        AnchorMode::Center => bbox.center(),
        AnchorMode::TopLeft => Point::new(bbox.min_x, bbox.max_y),
        AnchorMode::TopRight => Point::new(bbox.max_x, bbox.max_y),
        AnchorMode::BottomRight => Point::new(bbox.max_x, bbox.min_y),
        AnchorMode::BottomLeft => Point::new(bbox.min_x, bbox.min_y),
        AnchorMode::Custom => custom,
    }
}
