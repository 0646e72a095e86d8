//! Model collaborator: the persisted items behind the canvas.
//!
//! The canvas never parses or serializes files. Whatever owns the loaded
//! items implements [`Model`]: it can repopulate a [`Registry`] and exposes
//! each item's transform chain so commits land in the persisted data.
//!
//! [`SceneModel`] is a plain in-memory implementation used by hosts that
//! build their items in code, and by the tests.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use tracing::{debug, warn};

use crate::drawable::{Drawable, DrawableKind, ItemRef, Registry};
use crate::transform::AffineTransform;

/// The file/model collaborator.
pub trait Model {
    /// Number of persisted items.
    fn item_count(&self) -> usize;

    /// Add the drawables for item `index` to `registry`.
    fn draw_on_canvas(&self, index: usize, registry: &mut Registry, magnification: f64);

    /// Current entry of an item's transform chain.
    fn transform(&self, item: ItemRef) -> Option<AffineTransform>;

    /// Mutable entry of an item's transform chain.
    fn transform_mut(&mut self, item: ItemRef) -> Option<&mut AffineTransform>;

    /// Repopulate `registry` from every item, in item order.
    fn populate(&self, registry: &mut Registry, magnification: f64) {
        for index in 0..self.item_count() {
            self.draw_on_canvas(index, registry, magnification);
        }
    }
}

/// One renderable part of a [`SceneItem`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePart {
    pub kind: DrawableKind,
    pub draw_order: i64,
    /// Slot in the owning item's transform chain.
    pub transform_index: usize,
}

/// A persisted item: a name, a transform chain and the parts it draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneItem {
    pub name: String,
    pub transforms: Vec<AffineTransform>,
    pub parts: Vec<ScenePart>,
}

impl SceneItem {
    /// Item with a single part and an identity transform.
    #[must_use]
    pub fn single(name: impl Into<String>, kind: DrawableKind, draw_order: i64) -> Self {
        Self {
            name: name.into(),
            transforms: vec![AffineTransform::identity()],
            parts: vec![ScenePart { kind, draw_order, transform_index: 0 }],
        }
    }

    /// Drawable key for part `part`: the bare name for single-part items.
    #[must_use]
    pub fn part_key(&self, part: usize) -> String {
        if self.parts.len() == 1 {
            self.name.clone()
        } else {
            format!("{}-{part}", self.name)
        }
    }
}

/// In-memory list of items.
#[derive(Debug, Clone, Default)]
pub struct SceneModel {
    pub items: Vec<SceneItem>,
}

impl SceneModel {
    #[must_use]
    pub fn new(items: Vec<SceneItem>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, item: SceneItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }
}

impl Model for SceneModel {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Stroke widths are authored in screen pixels, so they shrink as the
    /// magnification grows.
    fn draw_on_canvas(&self, index: usize, registry: &mut Registry, magnification: f64) {
        let Some(item) = self.items.get(index) else {
            return;
        };
        for (part_index, part) in item.parts.iter().enumerate() {
            let origin = ItemRef { item: index, transform_index: part.transform_index };
            let Some(transform) = item.transforms.get(part.transform_index).copied() else {
                warn!(
                    item = %item.name,
                    part = part_index,
                    slot = part.transform_index,
                    "part refers to a missing transform slot; skipped"
                );
                continue;
            };
            let kind = scale_strokes(&part.kind, magnification);
            let drawable = Drawable::new(item.part_key(part_index), kind, part.draw_order, origin)
                .with_transform(transform);
            registry.insert(drawable);
        }
        debug!(item = %item.name, parts = item.parts.len(), "item drawn on canvas");
    }

    fn transform(&self, item: ItemRef) -> Option<AffineTransform> {
        self.items.get(item.item)?.transforms.get(item.transform_index).copied()
    }

    fn transform_mut(&mut self, item: ItemRef) -> Option<&mut AffineTransform> {
        self.items.get_mut(item.item)?.transforms.get_mut(item.transform_index)
    }
}

fn scale_strokes(kind: &DrawableKind, magnification: f64) -> DrawableKind {
    if magnification <= 0.0 || !magnification.is_finite() {
        return kind.clone();
    }
    let mut kind = kind.clone();
    match &mut kind {
        DrawableKind::Path(path) => path.stroke_width /= magnification,
        DrawableKind::Group(paths) => {
            for path in paths {
                path.stroke_width /= magnification;
            }
        }
        DrawableKind::Image(_) => {}
    }
    kind
}
