//! Property-based tests for pivot estimation and rebasing.
//!
//! Run with: cargo test -p repivot-core --test pivot_properties

use approx::assert_relative_eq;
use proptest::prelude::*;
use repivot_core::{
    center_by_average, center_by_bounds, extreme_along, rebase, rebase_in_place, Axis, AxisSet,
    Extreme, Point3, RebaseOffset, RotationState, Transform, Vector3,
};

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point3<f32>> {
    prop::array::uniform3(-100.0..100.0f32).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

fn arb_vertices() -> impl Strategy<Value = Vec<Point3<f32>>> {
    prop::collection::vec(arb_point(), 1..64)
}

fn arb_transform() -> impl Strategy<Value = Transform> {
    (
        prop::array::uniform3(-10.0..10.0f32),
        prop::array::uniform3(-3.0..3.0f32),
        prop::array::uniform3(0.25..4.0f32),
    )
        .prop_map(|([tx, ty, tz], [rx, ry, rz], [sx, sy, sz])| {
            Transform::identity()
                .with_translation(tx, ty, tz)
                .with_rotation(&RotationState::new(rx, ry, rz))
                .with_scale(sx, sy, sz)
        })
}

fn world(vertices: &[Point3<f32>], transform: &Transform) -> Vec<Point3<f32>> {
    vertices.iter().map(|v| transform.transform_point(v)).collect()
}

// =============================================================================
// Estimator
// =============================================================================

proptest! {
    #[test]
    fn proptest_bounds_center_is_aabb_midpoint(vertices in arb_vertices()) {
        let c = center_by_bounds(&vertices, &Transform::identity(), AxisSet::horizontal(Axis::Y))
            .unwrap();

        for axis in [Axis::X, Axis::Z] {
            let i = axis.index();
            let lo = vertices.iter().map(|v| v[i]).fold(f32::INFINITY, f32::min);
            let hi = vertices.iter().map(|v| v[i]).fold(f32::NEG_INFINITY, f32::max);
            prop_assert_eq!(c.get(axis), (lo + hi) / 2.0);
        }
    }

    #[test]
    fn proptest_average_is_mean_of_transformed(
        vertices in arb_vertices(),
        transform in arb_transform(),
    ) {
        let c = center_by_average(&vertices, &transform, AxisSet::ALL).unwrap();

        let placed = world(&vertices, &transform);
        let sum = placed.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        let mean = sum / placed.len() as f32;
        assert_relative_eq!(c.point.coords, mean, epsilon = 1e-2);
    }

    #[test]
    fn proptest_top_and_bottom_bound_every_vertex(
        vertices in arb_vertices(),
        transform in arb_transform(),
    ) {
        let top = extreme_along(&vertices, &transform, Extreme::Top, Axis::Y).unwrap();
        let bottom = extreme_along(&vertices, &transform, Extreme::Bottom, Axis::Y).unwrap();

        for p in world(&vertices, &transform) {
            prop_assert!(top.point.y >= p.y);
            prop_assert!(bottom.point.y <= p.y);
        }
    }

    #[test]
    fn proptest_bottom_picks_first_lowest(vertices in arb_vertices()) {
        let bottom = extreme_along(&vertices, &Transform::identity(), Extreme::Bottom, Axis::Y)
            .unwrap();

        let lowest = vertices.iter().map(|v| v.y).fold(f32::INFINITY, f32::min);
        let first = vertices.iter().find(|v| v.y == lowest).unwrap();
        prop_assert_eq!(bottom.point, *first);
    }

    #[test]
    fn proptest_top_picks_first_highest(vertices in arb_vertices()) {
        // whole-number heights so ties actually occur
        let vertices: Vec<Point3<f32>> = vertices
            .iter()
            .map(|v| Point3::new(v.x, (v.y / 25.0).round(), v.z))
            .collect();
        let top = extreme_along(&vertices, &Transform::identity(), Extreme::Top, Axis::Y)
            .unwrap();

        let highest = vertices.iter().map(|v| v.y).fold(f32::NEG_INFINITY, f32::max);
        let first = vertices.iter().find(|v| v.y == highest).unwrap();
        prop_assert_eq!(top.point, *first);
    }

    // =========================================================================
    // Rebaser
    // =========================================================================

    #[test]
    fn proptest_rebase_preserves_length_and_order(
        vertices in arb_vertices(),
        offset in arb_point(),
    ) {
        let out = rebase(&vertices, RebaseOffset::new(offset.coords)).unwrap();

        prop_assert_eq!(out.len(), vertices.len());
        for (before, after) in vertices.iter().zip(&out) {
            prop_assert_eq!(*after, before - offset.coords);
        }
    }

    #[test]
    fn proptest_rebase_round_trip(vertices in arb_vertices(), offset in arb_point()) {
        let moved = rebase(&vertices, RebaseOffset::new(offset.coords)).unwrap();
        let back = rebase(&moved, -RebaseOffset::new(offset.coords)).unwrap();

        for (original, restored) in vertices.iter().zip(&back) {
            assert_relative_eq!(*original, *restored, epsilon = 1e-4);
        }
    }

    #[test]
    fn proptest_in_place_matches_copy(vertices in arb_vertices(), offset in arb_point()) {
        let copied = rebase(&vertices, RebaseOffset::new(offset.coords)).unwrap();

        let mut in_place = vertices.clone();
        rebase_in_place(&mut in_place, RebaseOffset::new(offset.coords)).unwrap();
        prop_assert_eq!(copied, in_place);
    }

    #[test]
    fn proptest_rebase_keeps_world_positions(
        vertices in arb_vertices(),
        transform in arb_transform(),
        pivot in arb_point(),
    ) {
        let offset = RebaseOffset::from_world_pivot(&transform, &pivot).unwrap();
        let out = rebase(&vertices, offset).unwrap();

        // the object moves to the pivot, the vertices move the other way
        let moved = Transform { translation: pivot.coords, ..transform };
        for (before, after) in vertices.iter().zip(&out) {
            assert_relative_eq!(
                moved.transform_point(after),
                transform.transform_point(before),
                epsilon = 5e-2
            );
        }
    }
}

// =============================================================================
// Concrete scenarios
// =============================================================================

fn sample() -> Vec<Point3<f32>> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(1.0, 2.0, 0.0),
        Point3::new(1.0, 0.0, 4.0),
    ]
}

#[test]
fn test_sample_candidates() {
    let t = Transform::identity();
    let bounds = center_by_bounds(&sample(), &t, AxisSet::horizontal(Axis::Y)).unwrap();
    assert_eq!((bounds.get(Axis::X), bounds.get(Axis::Z)), (1.0, 2.0));

    let mean = center_by_average(&sample(), &t, AxisSet::ALL).unwrap();
    assert_eq!(mean.point, Point3::new(1.0, 0.5, 1.0));

    let top = extreme_along(&sample(), &t, Extreme::Top, Axis::Y).unwrap();
    assert_eq!(top.point, Point3::new(1.0, 2.0, 0.0));

    let bottom = extreme_along(&sample(), &t, Extreme::Bottom, Axis::Y).unwrap();
    assert_eq!(bottom.point, Point3::new(0.0, 0.0, 0.0));
}
