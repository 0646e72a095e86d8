//! Editor session: wires pointer events, tool changes and reloads through the
//! state machine, the committer and the render pipeline.
//!
//! Handlers return [`Action`]s for the presentation layer: status text,
//! selection changes, whether object actions should be enabled, committed
//! transforms, and when a new frame is ready to be rendered.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tiny_skia::Pixmap;
use tracing::{debug, error, info};

use crate::anchor::AnchorMode;
use crate::camera::{Camera, Point};
use crate::commit::{self, CommitError};
use crate::config::Settings;
use crate::doc::Model;
use crate::drawable::{Drawable, DrawableKey, Registry};
use crate::hit::hit_test;
use crate::input::{Interaction, Mode, PointerDown, Selection};
use crate::render::{Layer, RenderError, RenderPipeline, Scene};
use crate::transform::{AffineTransform, TransformError};

/// Notifications returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    StatusMessage(String),
    SelectionChanged(Option<DrawableKey>),
    /// Object-level actions (custom transform, ...) should be enabled or disabled.
    ObjectActionsEnabled(bool),
    TransformCommitted { key: DrawableKey, transform: AffineTransform },
    RenderNeeded,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Commit(#[from] CommitError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("no object selected")]
    NothingSelected,
    #[error("a drag gesture is in progress")]
    GestureInProgress,
    #[error("magnification must be positive and finite, got {0}")]
    InvalidMagnification(f64),
}

/// One editor session over a model.
#[derive(Debug)]
pub struct EngineCore<M> {
    model: M,
    settings: Settings,
    registry: Registry,
    camera: Camera,
    interaction: Interaction,
    pipeline: RenderPipeline,
    draw_axes: bool,
}

impl<M: Model> EngineCore<M> {
    /// Create a session for a `width`×`height` viewport and populate the canvas from `model`.
    ///
    /// # Errors
    ///
    /// `InvalidSize` if the viewport cannot be allocated.
    pub fn new(model: M, settings: Settings, width: u32, height: u32) -> Result<Self, RenderError> {
        let mut core = Self {
            model,
            settings,
            registry: Registry::new(),
            camera: Camera::new(f64::from(width), f64::from(height)),
            interaction: Interaction::new(),
            pipeline: RenderPipeline::new(width, height)?,
            draw_axes: true,
        };
        core.reload();
        Ok(core)
    }

    // --- Data inputs ---

    /// Rebuild the registry from the model (full reload). Drops the selection.
    pub fn reload(&mut self) -> Vec<Action> {
        let mut actions = self.clear_selection();
        self.registry.clear();
        self.model.populate(&mut self.registry, self.camera.magnification);
        self.pipeline.invalidate_all();
        info!(drawables = self.registry.len(), "canvas reloaded");
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Add or replace a drawable outside of a reload.
    pub fn add_drawable(&mut self, drawable: Drawable) -> Vec<Action> {
        let mut actions = self.forget(&drawable.key);
        self.registry.insert(drawable);
        self.pipeline.invalidate(Layer::Content);
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn remove_drawable(&mut self, key: &str) -> Vec<Action> {
        let mut actions = self.forget(key);
        if self.registry.remove(key).is_some() {
            self.pipeline.invalidate(Layer::Content);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    pub fn set_settings(&mut self, settings: Settings) -> Vec<Action> {
        self.settings = settings;
        self.pipeline.invalidate(Layer::Content);
        vec![Action::RenderNeeded]
    }

    // --- View ---

    /// # Errors
    ///
    /// `InvalidSize` for a zero-sized viewport; the previous size stays in effect.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<Vec<Action>, RenderError> {
        self.pipeline.resize(width, height)?;
        self.camera.viewport_width = f64::from(width);
        self.camera.viewport_height = f64::from(height);
        self.pipeline.invalidate_all();
        Ok(vec![Action::RenderNeeded])
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        self.camera.pan_by(dx, dy);
        self.pipeline.invalidate_all();
        vec![Action::RenderNeeded]
    }

    /// Change the magnification and repopulate, since items draw at a given magnification.
    /// Zero, negative and non-finite values are rejected and leave the camera as it was.
    pub fn set_magnification(&mut self, magnification: f64) -> Result<Vec<Action>, EngineError> {
        if !(magnification > 0.0 && magnification.is_finite()) {
            return Err(EngineError::InvalidMagnification(magnification));
        }
        self.camera.magnification = magnification;
        Ok(self.reload())
    }

    pub fn set_draw_axes(&mut self, draw_axes: bool) -> Vec<Action> {
        self.draw_axes = draw_axes;
        self.pipeline.invalidate(Layer::Background);
        vec![Action::RenderNeeded]
    }

    // --- Tools ---

    /// Switch tools, cancelling any gesture in flight.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        let had_selection = self.interaction.selection().is_some();
        self.interaction.set_mode(mode);
        self.pipeline.invalidate(Layer::Content);

        let mut actions = vec![Action::StatusMessage(mode.label().to_string())];
        if had_selection {
            actions.push(Action::SelectionChanged(None));
            actions.push(Action::ObjectActionsEnabled(false));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Returns false when the anchor mode is refused (local frame only allows `Origin`).
    pub fn set_anchor_mode(&mut self, mode: AnchorMode) -> bool {
        self.interaction.set_anchor_mode(mode)
    }

    pub fn set_custom_anchor(&mut self, point: Point) {
        self.interaction.set_custom_anchor(point);
    }

    pub fn set_lock_x(&mut self, locked: bool) {
        self.interaction.set_lock_x(locked);
    }

    pub fn set_lock_y(&mut self, locked: bool) {
        self.interaction.set_lock_y(locked);
    }

    /// Constrain drags to horizontal movement (locks Y).
    pub fn align_horizontal(&mut self, enabled: bool) {
        self.interaction.set_lock_y(enabled);
    }

    /// Constrain drags to vertical movement (locks X).
    pub fn align_vertical(&mut self, enabled: bool) {
        self.interaction.set_lock_x(enabled);
    }

    pub fn set_use_global_frame(&mut self, global: bool) -> Vec<Action> {
        self.interaction.set_use_global_frame(global);
        self.pipeline.invalidate(Layer::Content);
        vec![Action::RenderNeeded]
    }

    /// Explicit cancel: drop the selection and any candidate.
    pub fn deselect(&mut self) -> Vec<Action> {
        let mut actions = self.clear_selection();
        if !actions.is_empty() {
            self.pipeline.invalidate(Layer::Content);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Input events (canvas space) ---

    pub fn on_pointer_down(&mut self, point: Point) -> Vec<Action> {
        let had_selection = self.interaction.selection().is_some();
        let mut actions = Vec::new();
        match self.interaction.pointer_down(point, &self.registry) {
            PointerDown::Ignored => return actions,
            PointerDown::PanMode | PointerDown::Missed => {
                actions.push(Action::ObjectActionsEnabled(false));
                if had_selection {
                    actions.push(Action::SelectionChanged(None));
                }
            }
            PointerDown::Selected { key, dragging } => {
                actions.push(Action::StatusMessage(format!("Collided with {key}")));
                actions.push(Action::SelectionChanged(Some(key)));
                actions.push(Action::ObjectActionsEnabled(!dragging));
            }
        }
        self.pipeline.invalidate(Layer::Content);
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn on_pointer_move(&mut self, point: Point) -> Vec<Action> {
        if self.interaction.pointer_move(point).is_none() {
            return Vec::new();
        }
        self.pipeline.invalidate(Layer::Content);
        vec![Action::RenderNeeded]
    }

    /// End a drag. The candidate computed by the last move is what gets committed.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let mut actions = match self.interaction.pointer_up(&mut self.registry, &mut self.model) {
            Ok(Some(committed)) => vec![
                Action::TransformCommitted { key: committed.key, transform: committed.transform },
                Action::SelectionChanged(None),
                Action::ObjectActionsEnabled(false),
            ],
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!(error = %e, "commit rejected; candidate dropped");
                vec![Action::SelectionChanged(None), Action::ObjectActionsEnabled(false)]
            }
        };
        self.pipeline.invalidate(Layer::Content);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Input events (screen space) ---

    pub fn on_pointer_down_screen(&mut self, screen: Point) -> Vec<Action> {
        self.on_pointer_down(self.camera.screen_to_canvas(screen))
    }

    pub fn on_pointer_move_screen(&mut self, screen: Point) -> Vec<Action> {
        self.on_pointer_move(self.camera.screen_to_canvas(screen))
    }

    // --- Object actions ---

    /// Report what lies under `point` without starting a gesture.
    #[must_use]
    pub fn select_at(&self, point: Point) -> Vec<Action> {
        hit_test(point, &self.registry)
            .map(|key| Action::StatusMessage(format!("Collided with {key}")))
            .into_iter()
            .collect()
    }

    /// Apply a user-entered 3×3 matrix to the selected object, then deselect.
    ///
    /// # Errors
    ///
    /// `NothingSelected` without a selection, `GestureInProgress` mid-drag,
    /// `Transform(NotAffine)` for a projective matrix, `Commit` if the
    /// selection no longer resolves.
    pub fn apply_custom_transform(&mut self, matrix: [[f64; 3]; 3]) -> Result<Vec<Action>, EngineError> {
        if self.interaction.is_dragging() {
            return Err(EngineError::GestureInProgress);
        }
        let key = self
            .interaction
            .selected_key()
            .map(str::to_owned)
            .ok_or(EngineError::NothingSelected)?;
        let transform = AffineTransform::from_matrix3(matrix)?;
        let local = !self.interaction.use_global_frame();
        let transform = commit::commit(&mut self.registry, &mut self.model, &key, transform, local)?;

        self.interaction.deselect();
        self.pipeline.invalidate(Layer::Content);
        debug!(%key, "custom transform applied");
        Ok(vec![
            Action::TransformCommitted { key, transform },
            Action::SelectionChanged(None),
            Action::ObjectActionsEnabled(false),
            Action::RenderNeeded,
        ])
    }

    // --- Render ---

    /// Redraw dirty layers and return the composited frame.
    pub fn render(&mut self) -> &Pixmap {
        let scene = Scene {
            registry: &self.registry,
            camera: &self.camera,
            selection: self.interaction.selection(),
            candidate: self.interaction.candidate(),
            immediate_preview: self.settings.enable_immediate_preview,
            use_global_frame: self.interaction.use_global_frame(),
            draw_axes: self.draw_axes,
        };
        self.pipeline.render(&scene)
    }

    // --- Queries ---

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    #[must_use]
    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.interaction.selection()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.interaction.mode()
    }

    #[must_use]
    pub fn draw_axes(&self) -> bool {
        self.draw_axes
    }

    // --- Helpers ---

    fn clear_selection(&mut self) -> Vec<Action> {
        match self.interaction.deselect() {
            Some(_) => vec![Action::SelectionChanged(None), Action::ObjectActionsEnabled(false)],
            None => Vec::new(),
        }
    }

    fn forget(&mut self, key: &str) -> Vec<Action> {
        if self.interaction.forget(key) {
            vec![Action::SelectionChanged(None), Action::ObjectActionsEnabled(false)]
        } else {
            Vec::new()
        }
    }
}
