#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::drawable::{Drawable, DrawableKey, Registry};

/// Key of the topmost drawable under the canvas-space `point`.
///
/// Every drawable is considered; among those that collide the one with the
/// greatest draw-order wins. Equal draw-orders resolve to the drawable painted
/// last (greatest key), so repeated calls always agree.
#[must_use]
pub fn hit_test(point: Point, registry: &Registry) -> Option<DrawableKey> {
    registry
        .iter()
        .filter(|d| d.collide(point))
        .max_by(|a, b| paint_order(a, b))
        .map(|d| d.key.clone())
}

fn paint_order(a: &Drawable, b: &Drawable) -> std::cmp::Ordering {
    a.draw_order.cmp(&b.draw_order).then_with(|| a.key.cmp(&b.key))
}
