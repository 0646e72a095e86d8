#![allow(clippy::float_cmp)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::camera::Point;
use crate::doc::{SceneItem, SceneModel, ScenePart};
use crate::drawable::{DrawableKind, PathShape};
use crate::hit::hit_test;

const EPSILON: f64 = 1e-6;

fn point_approx_eq(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

fn random_transform(rng: &mut StdRng) -> AffineTransform {
    AffineTransform::new(
        rng.random_range(-2.0..2.0),
        rng.random_range(-2.0..2.0),
        rng.random_range(-2.0..2.0),
        rng.random_range(-2.0..2.0),
        rng.random_range(-20.0..20.0),
        rng.random_range(-20.0..20.0),
    )
}

fn random_point(rng: &mut StdRng) -> Point {
    Point::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0))
}

/// Model and registry with one square item "sq" starting at `initial`.
fn setup(initial: AffineTransform) -> (SceneModel, Registry) {
    let kind = DrawableKind::Path(PathShape::rect(Point::ORIGIN, Point::new(10.0, 10.0)));
    let mut item = SceneItem::single("sq", kind, 0);
    item.transforms[0] = initial;
    let model = SceneModel::new(vec![item]);
    let mut registry = Registry::new();
    model.populate(&mut registry, 1.0);
    (model, registry)
}

// =============================================================
// Composition order
// =============================================================

#[test]
fn global_commit_applies_candidate_after() {
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..100 {
        let old = random_transform(&mut rng);
        let candidate = random_transform(&mut rng);
        let (mut model, mut registry) = setup(old);
        let updated = commit(&mut registry, &mut model, "sq", candidate, false).unwrap();
        for _ in 0..5 {
            let p = random_point(&mut rng);
            assert!(point_approx_eq(updated.map_point(p), candidate.map_point(old.map_point(p))));
        }
    }
}

#[test]
fn local_commit_applies_candidate_first() {
    let mut rng = StdRng::seed_from_u64(22);
    for _ in 0..100 {
        let old = random_transform(&mut rng);
        let candidate = random_transform(&mut rng);
        let (mut model, mut registry) = setup(old);
        let updated = commit(&mut registry, &mut model, "sq", candidate, true).unwrap();
        for _ in 0..5 {
            let p = random_point(&mut rng);
            assert!(point_approx_eq(updated.map_point(p), old.map_point(candidate.map_point(p))));
        }
    }
}

#[test]
fn frames_differ_for_rotated_object() {
    let old = AffineTransform::rotate(std::f64::consts::FRAC_PI_2, Point::ORIGIN);
    let candidate = AffineTransform::translate(1.0, 0.0);
    // Global: moves right on screen.
    assert!(point_approx_eq(preview_transform(old, candidate, false).map_point(Point::ORIGIN), Point::new(1.0, 0.0)));
    // Local: moves along the object's rotated x axis, which points up.
    assert!(point_approx_eq(preview_transform(old, candidate, true).map_point(Point::ORIGIN), Point::new(0.0, 1.0)));
}

// =============================================================
// Side effects
// =============================================================

#[test]
fn commit_writes_model_and_registry() {
    let (mut model, mut registry) = setup(AffineTransform::identity());
    let updated = commit(&mut registry, &mut model, "sq", AffineTransform::translate(3.0, 4.0), false).unwrap();
    assert_eq!(updated, AffineTransform::translate(3.0, 4.0));
    assert_eq!(registry.get("sq").unwrap().transform(), updated);
    assert_eq!(model.items[0].transforms[0], updated);
}

#[test]
fn repeated_commits_accumulate() {
    let (mut model, mut registry) = setup(AffineTransform::identity());
    commit(&mut registry, &mut model, "sq", AffineTransform::translate(1.0, 0.0), false).unwrap();
    let updated = commit(&mut registry, &mut model, "sq", AffineTransform::translate(0.0, 2.0), false).unwrap();
    assert!(point_approx_eq(updated.map_point(Point::ORIGIN), Point::new(1.0, 2.0)));
}

// =============================================================
// Errors
// =============================================================

#[test]
fn missing_key_is_an_error() {
    let (mut model, mut registry) = setup(AffineTransform::identity());
    let err = commit(&mut registry, &mut model, "ghost", AffineTransform::identity(), false).unwrap_err();
    assert_eq!(err, CommitError::MissingKey("ghost".into()));
    assert_eq!(err.to_string(), "no drawable with key ghost");
}

#[test]
fn missing_item_is_an_error() {
    let (_, mut registry) = setup(AffineTransform::identity());
    let mut empty = SceneModel::default();
    let err = commit(&mut registry, &mut empty, "sq", AffineTransform::translate(1.0, 1.0), false).unwrap_err();
    assert!(matches!(err, CommitError::MissingItem { ref key, .. } if key == "sq"));
    // Nothing was written.
    assert!(registry.get("sq").unwrap().transform().is_identity());
}

// =============================================================
// Shared chain slots
// =============================================================

/// Item "g" with two parts drawn from the same chain slot:
/// g-0 at (0,0)-(10,10), g-1 at (30,0)-(40,10).
fn shared_slot_setup() -> (SceneModel, Registry) {
    let item = SceneItem {
        name: "g".into(),
        transforms: vec![AffineTransform::identity()],
        parts: vec![
            ScenePart {
                kind: DrawableKind::Path(PathShape::rect(Point::ORIGIN, Point::new(10.0, 10.0))),
                draw_order: 0,
                transform_index: 0,
            },
            ScenePart {
                kind: DrawableKind::Path(PathShape::rect(Point::new(30.0, 0.0), Point::new(40.0, 10.0))),
                draw_order: 0,
                transform_index: 0,
            },
        ],
    };
    let model = SceneModel::new(vec![item]);
    let mut registry = Registry::new();
    model.populate(&mut registry, 1.0);
    (model, registry)
}

#[test]
fn commit_moves_every_part_sharing_the_slot() {
    let (mut model, mut registry) = shared_slot_setup();
    let updated = commit(&mut registry, &mut model, "g-0", AffineTransform::translate(3.0, 0.0), false).unwrap();

    assert_eq!(model.items[0].transforms[0], updated);
    assert_eq!(registry.get("g-0").unwrap().transform(), updated);
    assert_eq!(registry.get("g-1").unwrap().transform(), updated);
    // g-1 now spans x 33..43 on the canvas.
    assert_eq!(hit_test(Point::new(42.0, 5.0), &registry), Some("g-1".to_string()));
}

#[test]
fn sibling_commit_composes_onto_the_current_slot() {
    let (mut model, mut registry) = shared_slot_setup();
    commit(&mut registry, &mut model, "g-0", AffineTransform::translate(3.0, 0.0), false).unwrap();
    let updated = commit(&mut registry, &mut model, "g-1", AffineTransform::translate(1.0, 0.0), false).unwrap();

    assert_eq!(updated.tx, 4.0);
    assert_eq!(model.items[0].transforms[0].tx, 4.0);
    assert_eq!(registry.get("g-0").unwrap().transform(), registry.get("g-1").unwrap().transform());
}
