//! Input model: editing modes, axis locks, the selection snapshot and the
//! gesture state machine.
//!
//! [`Interaction`] is the single owner of everything a gesture needs. A
//! pointer-down resolves a target through the hit tester and snapshots it into
//! a [`Selection`]; pointer-moves turn the pointer position into a candidate
//! transform relative to the anchor; pointer-up commits the candidate. Switching
//! modes or deselecting drops the candidate without committing it.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use tracing::{debug, trace};

use crate::anchor::{AnchorMode, resolve_anchor};
use crate::camera::Point;
use crate::commit::{self, CommitError};
use crate::consts::DEGENERATE_LENGTH_SQUARED;
use crate::doc::Model;
use crate::drawable::{BoundingBox, DrawableKey, Registry};
use crate::hit::hit_test;
use crate::transform::AffineTransform;

/// Which editing tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pick an object to enable object actions.
    Select,
    /// Move the view; never touches drawables.
    Pan,
    /// Drag to translate.
    #[default]
    Translate,
    /// Drag to rotate about the anchor.
    Rotate,
    /// Drag to scale about the anchor.
    Scale,
}

impl Mode {
    /// Whether a pointer-down on an object starts a drag in this mode.
    #[must_use]
    pub fn is_transform(self) -> bool {
        matches!(self, Self::Translate | Self::Rotate | Self::Scale)
    }

    /// Status-bar text announcing the mode.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Select => "Select mode",
            Self::Pan => "Pan mode",
            Self::Translate => "Translate mode",
            Self::Rotate => "Rotate mode",
            Self::Scale => "Scale mode",
        }
    }
}

/// Axis locks. At most one is set at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Locks {
    x: bool,
    y: bool,
}

impl Locks {
    #[must_use]
    pub fn x(self) -> bool {
        self.x
    }

    #[must_use]
    pub fn y(self) -> bool {
        self.y
    }

    /// Set the X lock; enabling it releases the Y lock.
    pub fn set_x(&mut self, locked: bool) {
        self.x = locked;
        if locked {
            self.y = false;
        }
    }

    /// Set the Y lock; enabling it releases the X lock.
    pub fn set_y(&mut self, locked: bool) {
        self.y = locked;
        if locked {
            self.x = false;
        }
    }
}

/// Snapshot of the selected drawable taken at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub key: DrawableKey,
    /// Canvas-space pivot for rotate/scale.
    pub anchor: Point,
    /// Canvas-space pointer position at pointer-down.
    pub saved_pointer: Point,
    /// Committed transform before the gesture.
    pub original_transform: AffineTransform,
    /// Canvas-space bounds before the gesture.
    pub bbox: BoundingBox,
    /// Local-frame bounds.
    pub local_bbox: BoundingBox,
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A transform drag is live; `candidate` is previewed but not committed.
    Dragging { candidate: AffineTransform },
}

/// Outcome of a pointer-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerDown {
    /// A drag is already running; re-entrant gestures are ignored.
    Ignored,
    /// Pan mode: drawables are not selectable.
    PanMode,
    /// Nothing under the pointer; any selection was cleared.
    Missed,
    /// `key` is now selected. `dragging` is true in transform modes.
    Selected { key: DrawableKey, dragging: bool },
}

/// A transform written back on pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub key: DrawableKey,
    pub transform: AffineTransform,
}

/// Geometry that gives a gesture no direction or no scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    #[error("gesture vector has zero length")]
    ZeroLength,
    #[error("gesture denominator is zero")]
    ZeroDenominator,
}

// =============================================================
// Candidate transforms
// =============================================================

/// Pure translation by the pointer delta, with locked axes zeroed.
#[must_use]
pub fn translate_candidate(point: Point, saved_pointer: Point, locks: Locks) -> AffineTransform {
    let delta = point - saved_pointer;
    let dx = if locks.x() { 0.0 } else { delta.x };
    let dy = if locks.y() { 0.0 } else { delta.y };
    AffineTransform::translate(dx, dy)
}

/// Rotation about `anchor` by the angle swept from `saved_pointer` to `point`.
///
/// # Errors
///
/// `ZeroLength` when either pointer position coincides with the anchor.
pub fn try_rotate_candidate(point: Point, saved_pointer: Point, anchor: Point) -> Result<AffineTransform, GestureError> {
    let v0 = saved_pointer - anchor;
    let v1 = point - anchor;
    if v0.length_squared() < DEGENERATE_LENGTH_SQUARED || v1.length_squared() < DEGENERATE_LENGTH_SQUARED {
        return Err(GestureError::ZeroLength);
    }
    let delta_angle = v1.angle() - v0.angle();
    Ok(AffineTransform::rotate(delta_angle, anchor))
}

/// Isotropic scale about `anchor` by the projection of the pointer onto its
/// starting direction; a locked axis keeps factor 1.
///
/// # Errors
///
/// `ZeroDenominator` when the starting pointer position is the anchor.
pub fn try_scale_candidate(
    point: Point,
    saved_pointer: Point,
    anchor: Point,
    locks: Locks,
) -> Result<AffineTransform, GestureError> {
    let v0 = saved_pointer - anchor;
    let v1 = point - anchor;
    let denominator = v0.length_squared();
    if denominator < DEGENERATE_LENGTH_SQUARED {
        return Err(GestureError::ZeroDenominator);
    }
    let factor = v1.dot(v0) / denominator;
    let fx = if locks.x() { 1.0 } else { factor };
    let fy = if locks.y() { 1.0 } else { factor };
    Ok(AffineTransform::scale(fx, fy, anchor))
}

/// Candidate transform for `mode` with the pointer at `point`.
///
/// Degenerate geometry yields the identity: the frame simply shows no change.
#[must_use]
pub fn candidate_transform(mode: Mode, point: Point, selection: &Selection, locks: Locks) -> AffineTransform {
    let result = match mode {
        Mode::Translate => Ok(translate_candidate(point, selection.saved_pointer, locks)),
        Mode::Rotate => try_rotate_candidate(point, selection.saved_pointer, selection.anchor),
        Mode::Scale => try_scale_candidate(point, selection.saved_pointer, selection.anchor, locks),
        Mode::Select | Mode::Pan => Ok(AffineTransform::identity()),
    };
    result.unwrap_or_else(|e| {
        trace!(?mode, error = %e, "degenerate gesture; using identity");
        AffineTransform::identity()
    })
}

// =============================================================
// State machine
// =============================================================

/// The editor session's interaction state.
#[derive(Debug, Clone)]
pub struct Interaction {
    mode: Mode,
    anchor_mode: AnchorMode,
    custom_anchor: Point,
    locks: Locks,
    use_global_frame: bool,
    selection: Option<Selection>,
    state: InputState,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            anchor_mode: AnchorMode::default(),
            custom_anchor: Point::ORIGIN,
            locks: Locks::default(),
            use_global_frame: true,
            selection: None,
            state: InputState::Idle,
        }
    }
}

impl Interaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn anchor_mode(&self) -> AnchorMode {
        self.anchor_mode
    }

    #[must_use]
    pub fn locks(&self) -> Locks {
        self.locks
    }

    #[must_use]
    pub fn use_global_frame(&self) -> bool {
        self.use_global_frame
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn selected_key(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.key.as_str())
    }

    #[must_use]
    pub fn state(&self) -> InputState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InputState::Dragging { .. })
    }

    /// The live candidate; identity when no drag is running.
    #[must_use]
    pub fn candidate(&self) -> AffineTransform {
        match self.state {
            InputState::Dragging { candidate } => candidate,
            InputState::Idle => AffineTransform::identity(),
        }
    }

    // --- Settings ---

    /// Switch tools. Cancels any gesture and clears the selection.
    pub fn set_mode(&mut self, mode: Mode) {
        debug!(from = ?self.mode, to = ?mode, "mode changed");
        self.mode = mode;
        self.clear();
    }

    /// Change the anchor mode. Refused (returns false) for anything but
    /// `Origin` while composing in the local frame.
    pub fn set_anchor_mode(&mut self, mode: AnchorMode) -> bool {
        if !self.use_global_frame && mode != AnchorMode::Origin {
            return false;
        }
        self.anchor_mode = mode;
        true
    }

    /// Point used by [`AnchorMode::Custom`].
    pub fn set_custom_anchor(&mut self, point: Point) {
        self.custom_anchor = point;
    }

    pub fn set_lock_x(&mut self, locked: bool) {
        self.locks.set_x(locked);
    }

    pub fn set_lock_y(&mut self, locked: bool) {
        self.locks.set_y(locked);
    }

    /// Choose global (canvas) or local (object) composition. The local frame
    /// always pivots at the origin, so leaving the global frame resets the anchor.
    pub fn set_use_global_frame(&mut self, global: bool) {
        self.use_global_frame = global;
        if !global {
            self.anchor_mode = AnchorMode::Origin;
        }
    }

    // --- Transitions ---

    /// Resolve the target under `point` and snapshot it.
    pub fn pointer_down(&mut self, point: Point, registry: &Registry) -> PointerDown {
        if self.is_dragging() {
            trace!("pointer-down ignored while dragging");
            return PointerDown::Ignored;
        }
        if self.mode == Mode::Pan {
            self.clear();
            return PointerDown::PanMode;
        }

        let Some(drawable) = hit_test(point, registry).and_then(|key| registry.get(&key)) else {
            self.clear();
            debug!(x = point.x, y = point.y, "pointer-down missed");
            return PointerDown::Missed;
        };

        let bbox = drawable.canvas_bounds();
        let anchor = resolve_anchor(self.anchor_mode, &bbox, self.custom_anchor);
        self.selection = Some(Selection {
            key: drawable.key.clone(),
            anchor,
            saved_pointer: point,
            original_transform: drawable.transform(),
            bbox,
            local_bbox: drawable.bounding_box(),
        });

        let dragging = self.mode.is_transform();
        self.state = if dragging {
            InputState::Dragging { candidate: AffineTransform::identity() }
        } else {
            InputState::Idle
        };
        debug!(key = %drawable.key, mode = ?self.mode, dragging, "selected");
        PointerDown::Selected { key: drawable.key.clone(), dragging }
    }

    /// Recompute the candidate for the pointer at `point`. `None` unless dragging.
    pub fn pointer_move(&mut self, point: Point) -> Option<AffineTransform> {
        if !self.is_dragging() {
            return None;
        }
        let selection = self.selection.as_ref()?;
        let candidate = candidate_transform(self.mode, point, selection, self.locks);
        trace!(?candidate, "candidate updated");
        self.state = InputState::Dragging { candidate };
        Some(candidate)
    }

    /// Finish a drag: commit the candidate and clear the selection.
    ///
    /// Returns `Ok(None)` when no drag was running.
    ///
    /// # Errors
    ///
    /// Propagates [`CommitError`] if the selected key vanished from the
    /// registry. The selection is cleared either way.
    pub fn pointer_up(&mut self, registry: &mut Registry, model: &mut dyn Model) -> Result<Option<Committed>, CommitError> {
        let InputState::Dragging { candidate } = self.state else {
            return Ok(None);
        };
        let Some(selection) = self.selection.take() else {
            self.state = InputState::Idle;
            return Ok(None);
        };
        self.state = InputState::Idle;

        let transform = commit::commit(registry, model, &selection.key, candidate, !self.use_global_frame)?;
        debug!(key = %selection.key, "drag committed");
        Ok(Some(Committed { key: selection.key, transform }))
    }

    /// Drop the selection and any in-flight candidate. Returns the key that was selected.
    pub fn deselect(&mut self) -> Option<DrawableKey> {
        let previous = self.selection.as_ref().map(|s| s.key.clone());
        self.clear();
        previous
    }

    /// Clear the selection if it refers to `key` (the drawable is going away).
    pub fn forget(&mut self, key: &str) -> bool {
        if self.selected_key() == Some(key) {
            self.clear();
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.selection = None;
        self.state = InputState::Idle;
    }
}
