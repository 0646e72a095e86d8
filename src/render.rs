//! Rendering: three independently invalidated layers composited into one frame.
//!
//! | Layer | Contents | Redrawn when |
//! |-------|----------|--------------|
//! | Background | white fill, optional axis guides | axes toggle, viewport or camera change |
//! | Content | every drawable in draw order | drag frames, commits, reloads |
//! | Overlay | selection outline, local axes | together with content |
//!
//! The frame is black, then background, content and overlay painted on top in
//! that order. This module only reads application state; it never mutates it.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use tiny_skia::{Color, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform};
use tracing::trace;

use crate::camera::{Camera, Point};
use crate::commit::preview_transform;
use crate::consts::{AXIS_COLOR, AXIS_EXTENT, GUIDE_STROKE_PX, LOCAL_AXIS_COLOR, SELECTION_COLOR};
use crate::drawable::{BoundingBox, Registry, Rgba};
use crate::input::Selection;
use crate::transform::AffineTransform;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} surface")]
    InvalidSize { width: u32, height: u32 },
}

/// One of the three compositing layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Content,
    Overlay,
}

/// How many times each layer has been redrawn, and how many frames composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedrawCounts {
    pub background: u64,
    pub content: u64,
    pub overlay: u64,
    pub frames: u64,
}

/// Read-only view of everything a frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub registry: &'a Registry,
    pub camera: &'a Camera,
    pub selection: Option<&'a Selection>,
    /// Live candidate for the selected drawable; identity when not dragging.
    pub candidate: AffineTransform,
    pub immediate_preview: bool,
    pub use_global_frame: bool,
    pub draw_axes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dirty {
    background: bool,
    content: bool,
    overlay: bool,
}

impl Dirty {
    const ALL: Self = Self { background: true, content: true, overlay: true };
}

/// Layered compositor.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    background: Pixmap,
    content: Pixmap,
    overlay: Pixmap,
    frame: Pixmap,
    dirty: Dirty,
    counts: RedrawCounts,
}

impl RenderPipeline {
    /// Allocate all layers at `width`×`height` pixels, every layer dirty.
    ///
    /// # Errors
    ///
    /// `InvalidSize` for a zero or oversized viewport.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            background: surface(width, height)?,
            content: surface(width, height)?,
            overlay: surface(width, height)?,
            frame: surface(width, height)?,
            dirty: Dirty::ALL,
            counts: RedrawCounts::default(),
        })
    }

    /// Reallocate every layer for a new viewport size.
    ///
    /// # Errors
    ///
    /// `InvalidSize` for a zero or oversized viewport; the old layers are kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let resized = Self::new(width, height)?;
        *self = Self { counts: self.counts, ..resized };
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Mark a layer for redraw. Content drags the overlay along with it.
    pub fn invalidate(&mut self, layer: Layer) {
        match layer {
            Layer::Background => self.dirty.background = true,
            Layer::Content => {
                self.dirty.content = true;
                self.dirty.overlay = true;
            }
            Layer::Overlay => self.dirty.overlay = true,
        }
    }

    pub fn invalidate_all(&mut self) {
        self.dirty = Dirty::ALL;
    }

    #[must_use]
    pub fn is_dirty(&self, layer: Layer) -> bool {
        match layer {
            Layer::Background => self.dirty.background,
            Layer::Content => self.dirty.content,
            Layer::Overlay => self.dirty.overlay,
        }
    }

    #[must_use]
    pub fn redraw_counts(&self) -> RedrawCounts {
        self.counts
    }

    /// Redraw the dirty layers and composite the frame.
    pub fn render(&mut self, scene: &Scene<'_>) -> &Pixmap {
        if self.dirty.background {
            draw_background(&mut self.background, scene);
            self.dirty.background = false;
            self.counts.background += 1;
        }
        if self.dirty.content {
            draw_content(&mut self.content, scene);
            self.dirty.content = false;
            self.counts.content += 1;
        }
        if self.dirty.overlay {
            draw_overlay(&mut self.overlay, scene);
            self.dirty.overlay = false;
            self.counts.overlay += 1;
        }
        self.composite();
        &self.frame
    }

    /// The last composited frame.
    #[must_use]
    pub fn frame(&self) -> &Pixmap {
        &self.frame
    }

    #[must_use]
    pub fn layer(&self, layer: Layer) -> &Pixmap {
        match layer {
            Layer::Background => &self.background,
            Layer::Content => &self.content,
            Layer::Overlay => &self.overlay,
        }
    }

    fn composite(&mut self) {
        self.frame.fill(Color::BLACK);
        let paint = PixmapPaint::default();
        for layer in [&self.background, &self.content, &self.overlay] {
            self.frame
                .draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
        }
        self.counts.frames += 1;
        trace!(frame = self.counts.frames, "frame composited");
    }
}

fn surface(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })
}

// =============================================================
// Layers
// =============================================================

fn draw_background(pixmap: &mut Pixmap, scene: &Scene<'_>) {
    pixmap.fill(Color::WHITE);
    if scene.draw_axes {
        let view = scene.camera.to_transform();
        draw_axes(pixmap, &view, Rgba::from_array(AXIS_COLOR));
    }
}

/// All drawables bottom-up. With immediate preview on, the selected drawable
/// shows the transform the pending commit would produce.
fn draw_content(pixmap: &mut Pixmap, scene: &Scene<'_>) {
    pixmap.fill(Color::TRANSPARENT);
    let view = scene.camera.to_transform();
    let selected = scene.selection.map(|s| s.key.as_str());

    for drawable in scene.registry.sorted() {
        if scene.immediate_preview && selected == Some(drawable.key.as_str()) {
            let preview = preview_transform(drawable.transform(), scene.candidate, !scene.use_global_frame);
            drawable.draw_with(pixmap, &view, &preview);
        } else {
            drawable.draw(pixmap, &view);
        }
    }
}

/// Selection outline. In the local frame the object's own axes are drawn too.
fn draw_overlay(pixmap: &mut Pixmap, scene: &Scene<'_>) {
    pixmap.fill(Color::TRANSPARENT);
    let Some(selection) = scene.selection else {
        return;
    };
    let Some(drawable) = scene.registry.get(&selection.key) else {
        return;
    };
    let view = scene.camera.to_transform();
    let outline = Rgba::from_array(SELECTION_COLOR);

    if scene.use_global_frame {
        let t = AffineTransform::compose(view, scene.candidate);
        draw_box(pixmap, &selection.bbox, &t, outline);
    } else {
        let object_frame = AffineTransform::compose(view, drawable.transform());
        draw_axes(pixmap, &object_frame, Rgba::from_array(LOCAL_AXIS_COLOR));
        let t = AffineTransform::compose(object_frame, scene.candidate);
        draw_box(pixmap, &selection.local_bbox, &t, outline);
    }
}

// =============================================================
// Helpers
// =============================================================

/// Stroke straight segments whose endpoints are mapped to pixels first, so
/// guide lines keep a constant screen width.
#[allow(clippy::cast_possible_truncation)]
fn stroke_segments(pixmap: &mut Pixmap, segments: &[(Point, Point)], to_pixels: &AffineTransform, color: Rgba) {
    let mut pb = PathBuilder::new();
    for (a, b) in segments {
        let a = to_pixels.map_point(*a);
        let b = to_pixels.map_point(*b);
        pb.move_to(a.x as f32, a.y as f32);
        pb.line_to(b.x as f32, b.y as f32);
    }
    let Some(path) = pb.finish() else {
        return;
    };
    let stroke = Stroke { width: GUIDE_STROKE_PX, ..Stroke::default() };
    pixmap.stroke_path(&path, &color.paint(), &stroke, Transform::identity(), None);
}

fn draw_axes(pixmap: &mut Pixmap, to_pixels: &AffineTransform, color: Rgba) {
    let segments = [
        (Point::new(-AXIS_EXTENT, 0.0), Point::new(AXIS_EXTENT, 0.0)),
        (Point::new(0.0, -AXIS_EXTENT), Point::new(0.0, AXIS_EXTENT)),
    ];
    stroke_segments(pixmap, &segments, to_pixels, color);
}

fn draw_box(pixmap: &mut Pixmap, bbox: &BoundingBox, to_pixels: &AffineTransform, color: Rgba) {
    let [a, b, c, d] = bbox.corners();
    stroke_segments(pixmap, &[(a, b), (b, c), (c, d), (d, a)], to_pixels, color);
}
