//! Integration tests for partix-contact.

use glam::Vec3;
use partix_contact::{resolve_all, BoundingPlane, Collider, ContactResult, FaceGrid};
use partix_mesh::generators::{box_block, regular_tetrahedron};
use partix_mesh::Point;
use partix_types::PartixError;

const TICK: f32 = 0.02;

fn point_at(position: Vec3, velocity: Vec3, friction: f32) -> Point {
    let mut p = Point::new(position, 1.0);
    p.velocity = velocity;
    p.friction = friction;
    p
}

// ─── Plane ────────────────────────────────────────────────────

#[test]
fn plane_normalises_normal() {
    let plane = BoundingPlane::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0)).unwrap();
    assert!((plane.normal().length() - 1.0).abs() < 1e-6);
    assert!((plane.signed_distance(Vec3::new(0.0, 3.0, 4.0)) - 5.0).abs() < 1e-5);
}

#[test]
fn plane_rejects_zero_normal() {
    let err = BoundingPlane::new(Vec3::ONE, Vec3::ZERO).unwrap_err();
    assert!(matches!(err, PartixError::InvalidConfig(_)));
    assert!(BoundingPlane::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Y).is_err());
}

#[test]
fn penetrating_point_lands_on_plane() {
    let plane = BoundingPlane::ground(0.0);
    let mut points = vec![point_at(
        Vec3::new(1.0, -0.3, 2.0),
        Vec3::new(0.0, -4.0, 0.0),
        0.0,
    )];
    let result = plane.resolve(&mut points, 0.0, TICK);

    assert_eq!(result.resolved_count, 1);
    assert!((result.max_penetration - 0.3).abs() < 1e-6);
    assert!((result.max_impulse - 4.0).abs() < 1e-6);
    assert_eq!(points[0].position, Vec3::new(1.0, 0.0, 2.0));
    assert_eq!(points[0].velocity, Vec3::ZERO);
}

#[test]
fn separating_velocity_is_kept() {
    let plane = BoundingPlane::ground(0.0);
    let mut points = vec![point_at(Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.0, 2.0, 0.0), 1.0)];
    let result = plane.resolve(&mut points, 0.0, TICK);
    assert_eq!(result.max_impulse, 0.0);
    assert_eq!(points[0].velocity, Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn points_above_and_pinned_points_untouched() {
    let plane = BoundingPlane::ground(0.0);
    let mut pinned = Point::new(Vec3::new(0.0, -1.0, 0.0), 0.0);
    pinned.velocity = Vec3::NEG_Y;
    let mut points = vec![
        point_at(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Y, 0.0),
        pinned,
    ];
    let before = points.clone();
    let result = plane.resolve(&mut points, 0.0, TICK);
    assert!(result.is_empty());
    assert_eq!(points, before);
}

#[test]
fn coulomb_friction_scales_tangential_velocity() {
    let plane = BoundingPlane::ground(0.0);
    let mut points = vec![point_at(Vec3::new(0.0, -0.01, 0.0), Vec3::new(5.0, -1.0, 0.0), 0.5)];
    plane.resolve(&mut points, 0.0, TICK);
    // 1 − μ·|Δvn|/|vt| = 1 − 0.5·1/5
    assert!((points[0].velocity.x - 4.5).abs() < 1e-5);
    assert_eq!(points[0].velocity.y, 0.0);
}

#[test]
fn kinetic_friction_damps_sliding() {
    let plane = BoundingPlane::ground(0.0);
    let mut points = vec![point_at(Vec3::new(0.0, -0.01, 0.0), Vec3::new(5.0, -1.0, 0.0), 0.5)];
    plane.resolve(&mut points, 10.0, TICK);
    // Coulomb 0.9, then 1 − 10·0.02 = 0.8
    assert!((points[0].velocity.x - 3.6).abs() < 1e-5);
}

#[test]
fn strong_friction_stops_tangential_motion() {
    let plane = BoundingPlane::ground(0.0);
    let mut points = vec![point_at(Vec3::new(0.0, -0.01, 0.0), Vec3::new(1.0, -1.0, 1.0), 5.0)];
    plane.resolve(&mut points, 0.0, TICK);
    assert_eq!(points[0].velocity, Vec3::ZERO);
}

#[test]
fn friction_brings_sliding_point_to_rest() {
    let plane = BoundingPlane::ground(0.0);
    let mut points = vec![point_at(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.5)];
    for _ in 0..100 {
        let p = &mut points[0];
        p.velocity.y -= 9.8 * TICK;
        p.position += p.velocity * TICK;
        plane.resolve(&mut points, 0.0, TICK);
    }
    let p = &points[0];
    assert_eq!(p.velocity.x, 0.0);
    assert!(p.position.y >= 0.0);
    assert!(p.position.x > 0.0);
}

#[test]
fn tilted_plane_projects_along_normal() {
    let plane = BoundingPlane::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)).unwrap();
    let mut points = vec![point_at(Vec3::new(-1.0, 0.0, 0.0), Vec3::ZERO, 0.0)];
    plane.resolve(&mut points, 0.0, TICK);
    assert!(plane.signed_distance(points[0].position).abs() < 1e-6);
    assert!(points[0].position.distance(Vec3::new(-0.5, 0.5, 0.0)) < 1e-6);
}

#[test]
fn collider_trait_dispatch() {
    let plane = BoundingPlane::ground(1.0);
    let collider: &dyn Collider = &plane;
    assert_eq!(collider.name(), "bounding_plane");
    let mut points = vec![point_at(Vec3::ZERO, Vec3::ZERO, 0.0)];
    let result = collider.resolve(&mut points, 0.0, TICK);
    assert_eq!(result.resolved_count, 1);
    assert_eq!(points[0].position.y, 1.0);
}

#[test]
fn colliders_resolve_in_sequence() {
    let floor = BoundingPlane::ground(0.0);
    let wall = BoundingPlane::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)).unwrap();
    let mut points = vec![
        point_at(Vec3::new(0.5, -0.2, 0.0), Vec3::ZERO, 0.0),
        point_at(Vec3::new(1.5, 0.5, 0.0), Vec3::ZERO, 0.0),
        point_at(Vec3::new(0.5, 0.5, 0.0), Vec3::ZERO, 0.0),
    ];

    let result = resolve_all(&[&floor, &wall], &mut points, 0.0, TICK);
    assert_eq!(result.resolved_count, 2);
    assert!((result.max_penetration - 0.5).abs() < 1e-6);
    assert!(points[0].position.distance(Vec3::new(0.5, 0.0, 0.0)) < 1e-6);
    assert!(points[1].position.distance(Vec3::new(1.0, 0.5, 0.0)) < 1e-6);
    assert_eq!(points[2].position, Vec3::new(0.5, 0.5, 0.0));

    assert!(resolve_all(&[], &mut points, 0.0, TICK).is_empty());
}

#[test]
fn contact_results_merge() {
    let mut a = ContactResult {
        resolved_count: 2,
        max_penetration: 0.1,
        max_impulse: 3.0,
    };
    let b = ContactResult {
        resolved_count: 1,
        max_penetration: 0.4,
        max_impulse: 1.0,
    };
    a.merge(&b);
    assert_eq!(a.resolved_count, 3);
    assert_eq!(a.max_penetration, 0.4);
    assert_eq!(a.max_impulse, 3.0);
}

// ─── Face grid ────────────────────────────────────────────────

#[test]
fn ray_hits_box_top_from_above() {
    let mesh = box_block(2, 2, 2, 0.5, 1.0).unwrap();
    let grid = FaceGrid::build(mesh.points(), mesh.faces(), 0.5);
    assert!(grid.cell_count() > 0);

    let hit = grid
        .raycast(Vec3::new(0.3, 5.0, 0.62), Vec3::new(0.3, -5.0, 0.62))
        .expect("ray should hit the top face");
    assert!((hit.point.y - 1.0).abs() < 1e-5);
    assert!((hit.t - 0.4).abs() < 1e-5);
    assert!((hit.barycentric.element_sum() - 1.0).abs() < 1e-5);
}

#[test]
fn grid_agrees_with_brute_force() {
    let mesh = box_block(3, 2, 2, 0.4, 1.0).unwrap();
    let grid = FaceGrid::build(mesh.points(), mesh.faces(), 0.3);

    let rays = [
        (Vec3::new(-2.0, 0.3, 0.35), Vec3::new(3.0, 0.4, 0.3)),
        (Vec3::new(0.55, 3.0, 0.1), Vec3::new(0.6, -3.0, 0.7)),
        (Vec3::new(2.0, 2.1, 1.9), Vec3::new(-1.0, -0.9, -1.1)),
        (Vec3::new(0.61, 0.37, -4.0), Vec3::new(0.62, 0.33, 4.0)),
    ];
    for (r0, r1) in rays {
        let a = grid.raycast(r0, r1).expect("grid hit");
        let b = grid.raycast_brute_force(r0, r1).expect("brute-force hit");
        assert!((a.t - b.t).abs() < 1e-5, "ray {r0} → {r1}: {} vs {}", a.t, b.t);
    }
}

#[test]
fn far_endpoints_still_hit() {
    let mesh = box_block(2, 2, 2, 0.5, 1.0).unwrap();
    let grid = FaceGrid::build(mesh.points(), mesh.faces(), 0.5);

    // Millions of cells end to end; only the stretch over the box is walked.
    let r0 = Vec3::new(0.3, 1.0e6, 0.62);
    let r1 = Vec3::new(0.3, -1.0e6, 0.62);
    let hit = grid.raycast(r0, r1).expect("ray should hit the top face");
    let brute = grid.raycast_brute_force(r0, r1).expect("brute-force hit");
    assert_eq!(hit.face, brute.face);
    assert!((hit.point.y - 1.0).abs() < 0.2);
}

#[test]
fn ray_misses_and_back_faces() {
    let mesh = regular_tetrahedron(1.0, 1.0).unwrap();
    let grid = FaceGrid::build(mesh.points(), mesh.faces(), 0.25);

    assert!(grid
        .raycast(Vec3::new(5.0, 5.0, 5.0), Vec3::new(6.0, 5.0, 5.0))
        .is_none());

    // From the centre outward only back faces are crossed.
    assert!(grid.raycast(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.1)).is_none());

    // The reverse direction enters through a front face.
    let hit = grid.raycast(Vec3::new(0.0, 3.0, 0.1), Vec3::ZERO).unwrap();
    assert!(hit.face.0 < 4);
    assert!(hit.t > 0.0 && hit.t < 1.0);
}
