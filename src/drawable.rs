//! Drawables and the registry that owns them.
//!
//! A [`Drawable`] is the canvas-side view of one persisted item (or one part
//! of it): a local-frame bounding box, a draw-order, the current transform and
//! a closed set of renderable kinds. The persisted item itself belongs to the
//! model collaborator; a drawable only remembers where it came from through
//! an [`ItemRef`].
//!
//! [`Registry`] is the only place drawables live. Rendering walks it in
//! ascending `(draw_order, key)` order via [`Registry::sorted`].

#[cfg(test)]
#[path = "drawable_test.rs"]
mod drawable_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke};
use tracing::trace;

use crate::camera::Point;
use crate::transform::AffineTransform;

/// Unique key for a drawable, stable for its lifetime on the canvas.
pub type DrawableKey = String;

// =============================================================
// Bounding boxes
// =============================================================

/// Axis-aligned box. `min_y` is the visual bottom in the Y-up canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Box spanning two opposite corners, in either order.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |bbox, p| bbox.including(p)))
    }

    #[must_use]
    pub fn including(self, p: Point) -> Self {
        Self {
            min_x: self.min_x.min(p.x),
            min_y: self.min_y.min(p.y),
            max_x: self.max_x.max(p.x),
            max_y: self.max_y.max(p.y),
        }
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        self.including(Point::new(other.min_x, other.min_y))
            .including(Point::new(other.max_x, other.max_y))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Corners in order: bottom-left, bottom-right, top-right, top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Axis-aligned bounds of this box after mapping through `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &AffineTransform) -> Self {
        let [a, b, c, d] = self.corners().map(|p| transform.map_point(p));
        Self::new(a, a).including(b).including(c).including(d)
    }
}

// =============================================================
// Drawable kinds
// =============================================================

/// 8-bit straight-alpha colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    pub(crate) fn paint(self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(self.r, self.g, self.b, self.a);
        paint.anti_alias = true;
        paint
    }
}

/// A polyline or polygon in the drawable's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    pub points: Vec<Point>,
    pub closed: bool,
    pub stroke: Rgba,
    /// Stroke width in local units.
    pub stroke_width: f64,
    /// Interior fill; only used for closed paths.
    pub fill: Option<Rgba>,
}

impl PathShape {
    /// Closed, unfilled rectangle outline.
    #[must_use]
    pub fn rect(min: Point, max: Point) -> Self {
        let bbox = BoundingBox::new(min, max);
        Self { points: bbox.corners().to_vec(), closed: true, stroke: Rgba::BLACK, stroke_width: 1.0, fill: None }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.points.iter().copied())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw(&self, pixmap: &mut Pixmap, transform: tiny_skia::Transform) {
        let mut pb = PathBuilder::new();
        let mut points = self.points.iter();
        let Some(first) = points.next() else {
            return;
        };
        pb.move_to(first.x as f32, first.y as f32);
        for p in points {
            pb.line_to(p.x as f32, p.y as f32);
        }
        if self.closed {
            pb.close();
        }
        let Some(path) = pb.finish() else {
            return;
        };

        if self.closed {
            if let Some(fill) = self.fill {
                pixmap.fill_path(&path, &fill.paint(), FillRule::Winding, transform, None);
            }
        }
        let stroke = Stroke { width: self.stroke_width as f32, ..Stroke::default() };
        pixmap.stroke_path(&path, &self.stroke.paint(), &stroke, transform, None);
    }
}

/// An embedded raster image whose lower-left pixel row sits at `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageShape {
    pub origin: Point,
    pub pixmap: Pixmap,
}

impl ImageShape {
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let size = Point::new(f64::from(self.pixmap.width()), f64::from(self.pixmap.height()));
        BoundingBox::new(self.origin, self.origin + size)
    }

    /// Pixel rows run downward, the canvas runs upward: flip around the image height.
    fn image_to_local(&self) -> AffineTransform {
        let height = f64::from(self.pixmap.height());
        AffineTransform::new(1.0, 0.0, 0.0, -1.0, self.origin.x, self.origin.y + height)
    }

    fn draw(&self, pixmap: &mut Pixmap, transform: &AffineTransform) {
        let full = AffineTransform::compose(*transform, self.image_to_local());
        pixmap.draw_pixmap(0, 0, self.pixmap.as_ref(), &PixmapPaint::default(), full.to_skia(), None);
    }
}

/// The closed set of things a drawable can render.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawableKind {
    /// A single path.
    Path(PathShape),
    /// Several paths produced together (e.g. by a script item).
    Group(Vec<PathShape>),
    /// An embedded raster image.
    Image(ImageShape),
}

impl DrawableKind {
    /// Local-frame bounds. Kinds without geometry report a zero box at the origin.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let bbox = match self {
            Self::Path(path) => path.bounding_box(),
            Self::Group(paths) => paths
                .iter()
                .filter_map(PathShape::bounding_box)
                .reduce(BoundingBox::union),
            Self::Image(image) => Some(image.bounding_box()),
        };
        bbox.unwrap_or_default()
    }

    /// Render into `pixmap`; `transform` maps local coordinates to pixels.
    pub fn draw(&self, pixmap: &mut Pixmap, transform: &AffineTransform) {
        match self {
            Self::Path(path) => path.draw(pixmap, transform.to_skia()),
            Self::Group(paths) => {
                let skia = transform.to_skia();
                for path in paths {
                    path.draw(pixmap, skia);
                }
            }
            Self::Image(image) => image.draw(pixmap, transform),
        }
    }
}

// =============================================================
// Drawable
// =============================================================

/// Non-owning reference to the persisted item (and the slot in its transform
/// chain) a drawable renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ItemRef {
    pub item: usize,
    pub transform_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub key: DrawableKey,
    pub kind: DrawableKind,
    /// Paint order and hit-test precedence; higher is on top.
    pub draw_order: i64,
    pub origin: ItemRef,
    bbox: BoundingBox,
    transform: AffineTransform,
}

impl Drawable {
    #[must_use]
    pub fn new(key: impl Into<DrawableKey>, kind: DrawableKind, draw_order: i64, origin: ItemRef) -> Self {
        let bbox = kind.bounding_box();
        Self { key: key.into(), kind, draw_order, origin, bbox, transform: AffineTransform::identity() }
    }

    /// Set the starting transform, normally copied from the item's chain at load.
    #[must_use]
    pub fn with_transform(mut self, transform: AffineTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Bounds in the drawable's local frame.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Bounds after the current transform, in canvas space.
    #[must_use]
    pub fn canvas_bounds(&self) -> BoundingBox {
        self.bbox.transformed(&self.transform)
    }

    #[must_use]
    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    pub(crate) fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    /// Whether the canvas-space `point` lies on this drawable.
    ///
    /// The point is pulled back into the local frame so rotated boxes are
    /// tested exactly. A singular transform falls back to the canvas bounds.
    #[must_use]
    pub fn collide(&self, point: Point) -> bool {
        match self.transform.invert() {
            Ok(inverse) => self.bbox.contains(inverse.map_point(point)),
            Err(e) => {
                trace!(key = %self.key, error = %e, "singular transform; testing canvas bounds");
                self.canvas_bounds().contains(point)
            }
        }
    }

    /// Draw with `view` (canvas → pixels) and the given object transform.
    pub fn draw_with(&self, pixmap: &mut Pixmap, view: &AffineTransform, transform: &AffineTransform) {
        let full = AffineTransform::compose(*view, *transform);
        self.kind.draw(pixmap, &full);
    }

    /// Draw with the committed transform.
    pub fn draw(&self, pixmap: &mut Pixmap, view: &AffineTransform) {
        self.draw_with(pixmap, view, &self.transform);
    }
}

// =============================================================
// Registry
// =============================================================

/// Owned collection of every drawable on the canvas.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    drawables: HashMap<DrawableKey, Drawable>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self { drawables: HashMap::new() }
    }

    /// Insert or replace a drawable, returning the one it replaced.
    pub fn insert(&mut self, drawable: Drawable) -> Option<Drawable> {
        self.drawables.insert(drawable.key.clone(), drawable)
    }

    pub fn remove(&mut self, key: &str) -> Option<Drawable> {
        self.drawables.remove(key)
    }

    /// Drop every drawable (full reload).
    pub fn clear(&mut self) {
        self.drawables.clear();
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Drawable> {
        self.drawables.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.drawables.contains_key(key)
    }

    /// Replace the transform of every drawable rendered from the chain slot
    /// `origin`. Parts sharing a slot move together. Returns how many changed.
    pub(crate) fn set_transform_for(&mut self, origin: ItemRef, transform: AffineTransform) -> usize {
        let mut updated = 0;
        for drawable in self.drawables.values_mut().filter(|d| d.origin == origin) {
            drawable.set_transform(transform);
            updated += 1;
        }
        updated
    }

    /// Every drawable, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables.values()
    }

    /// Every drawable sorted by `(draw_order, key)`, bottom first.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Drawable> {
        let mut drawables: Vec<&Drawable> = self.drawables.values().collect();
        drawables.sort_by(|a, b| a.draw_order.cmp(&b.draw_order).then_with(|| a.key.cmp(&b.key)));
        drawables
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }
}
