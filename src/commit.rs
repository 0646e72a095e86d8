//! Folding a candidate transform into an object's persistent transform chain.
//!
//! Global frame: `T_new = C ∘ T_old`, the candidate acts in canvas space after
//! the existing transform, so the object moves as seen on screen.
//! Local frame: `T_new = T_old ∘ C`, the candidate acts first, along the
//! object's own axes.

#[cfg(test)]
#[path = "commit_test.rs"]
mod commit_test;

use tracing::info;

use crate::doc::Model;
use crate::drawable::{DrawableKey, ItemRef, Registry};
use crate::transform::AffineTransform;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommitError {
    #[error("no drawable with key {0}")]
    MissingKey(DrawableKey),
    #[error("drawable {key} refers to missing item {item:?}")]
    MissingItem { key: DrawableKey, item: ItemRef },
}

/// The transform `commit` would produce, without writing anything.
#[must_use]
pub fn preview_transform(committed: AffineTransform, candidate: AffineTransform, use_local_frame: bool) -> AffineTransform {
    if use_local_frame {
        AffineTransform::compose(committed, candidate)
    } else {
        AffineTransform::compose(candidate, committed)
    }
}

/// Compose `candidate` into the transform chain entry behind `key`.
///
/// Writes the result to the model's chain and to every drawable rendered
/// from that chain slot, and returns it.
///
/// # Errors
///
/// `MissingKey` if `key` is not in the registry; `MissingItem` if the
/// drawable's item reference no longer resolves in the model. Both are caller
/// contract violations.
pub fn commit(
    registry: &mut Registry,
    model: &mut dyn Model,
    key: &str,
    candidate: AffineTransform,
    use_local_frame: bool,
) -> Result<AffineTransform, CommitError> {
    let drawable = registry.get(key).ok_or_else(|| CommitError::MissingKey(key.to_string()))?;
    let origin = drawable.origin;
    let slot = model
        .transform_mut(origin)
        .ok_or_else(|| CommitError::MissingItem { key: key.to_string(), item: origin })?;

    let updated = preview_transform(*slot, candidate, use_local_frame);
    *slot = updated;
    let parts = registry.set_transform_for(origin, updated);

    info!(%key, parts, local = use_local_frame, ?updated, "transform committed");
    Ok(updated)
}
