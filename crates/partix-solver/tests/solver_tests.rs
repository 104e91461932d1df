//! Integration tests for partix-solver.

use glam::{Mat4, Quat, Vec3};
use partix_math::geometry::tetrahedron_volume;
use partix_mesh::generators::{box_block, regular_tetrahedron};
use partix_mesh::TetrahedralMesh;
use partix_solver::{FreezeState, FreezeTracker, SoftVolume, VolumeConfig};
use partix_types::{PartixError, PointId};

const TICK: f32 = 0.02;

fn unit_tetrahedron(config: VolumeConfig) -> SoftVolume {
    SoftVolume::new(regular_tetrahedron(1.0, 1.0).unwrap(), config).unwrap()
}

fn step(volume: &mut SoftVolume, gravity: Vec3) {
    volume.advance(gravity, TICK);
    volume.update_freeze(TICK);
}

fn max_rest_deviation(volume: &SoftVolume) -> f32 {
    volume
        .points()
        .iter()
        .map(|p| p.position.distance(p.source_position))
        .fold(0.0, f32::max)
}

fn current_volume(volume: &SoftVolume) -> f32 {
    let p = volume.points();
    tetrahedron_volume(p[0].position, p[1].position, p[2].position, p[3].position)
}

// ─── Construction ─────────────────────────────────────────────

#[test]
fn volume_requires_set_up_mesh() {
    let mut mesh = TetrahedralMesh::new();
    mesh.add_point(Vec3::ZERO, 1.0);
    mesh.add_point(Vec3::X, 1.0);
    mesh.add_point(Vec3::Y, 1.0);
    mesh.add_point(Vec3::Z, 1.0);
    mesh.add_tetrahedron(0, 1, 2, 3);
    let err = SoftVolume::new(mesh, VolumeConfig::default()).unwrap_err();
    assert!(matches!(err, PartixError::MeshNotSetUp));
}

#[test]
fn invalid_config_rejected() {
    let mesh = regular_tetrahedron(1.0, 1.0).unwrap();
    let config = VolumeConfig {
        restore_factor: 1.5,
        ..Default::default()
    };
    assert!(matches!(
        SoftVolume::new(mesh, config),
        Err(PartixError::InvalidConfig(_))
    ));

    let config = VolumeConfig {
        freeze_duration: f32::NAN,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn point_friction_applied_on_construction() {
    let config = VolumeConfig {
        point_friction: Some(0.8),
        ..Default::default()
    };
    let volume = unit_tetrahedron(config);
    assert!(volume.points().iter().all(|p| p.friction == 0.8));
}

#[test]
fn rest_shape_counts_incidence() {
    let mesh = box_block(1, 1, 1, 1.0, 1.0).unwrap();
    let volume = SoftVolume::new(mesh, VolumeConfig::default()).unwrap();
    let rest = volume.rest_shape();
    assert_eq!(rest.len(), 5);
    // Five tetrahedra, four points each.
    assert_eq!(rest.incidence.iter().sum::<u32>(), 20);
    assert!((rest.total_rest_volume() - 1.0).abs() < 1e-5);
    for e in &rest.elements {
        assert!((e.weights.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }
}

#[test]
fn config_toml_round_trip() {
    let config = VolumeConfig {
        restore_factor: 0.5,
        point_friction: Some(0.8),
        ..VolumeConfig::interactive()
    };
    let text = toml::to_string(&config).unwrap();
    let back: VolumeConfig = toml::from_str(&text).unwrap();
    assert_eq!(config, back);

    // Missing keys fall back to defaults.
    let partial: VolumeConfig = toml::from_str("stretch_factor = 0.2").unwrap();
    assert_eq!(partial.stretch_factor, 0.2);
    assert_eq!(partial.restore_factor, VolumeConfig::default().restore_factor);
}

// ─── Integration ──────────────────────────────────────────────

#[test]
fn rest_pose_is_stable_with_full_restore() {
    let config = VolumeConfig {
        restore_factor: 1.0,
        auto_freezing: false,
        ..Default::default()
    };
    let mut volume = unit_tetrahedron(config);
    for _ in 0..200 {
        step(&mut volume, Vec3::ZERO);
    }
    assert!(
        max_rest_deviation(&volume) < 1e-4,
        "drifted {}",
        max_rest_deviation(&volume)
    );
    assert!(volume.kinetic_energy() < 1e-6);
}

#[test]
fn free_fall_follows_symplectic_euler() {
    let mut volume = unit_tetrahedron(VolumeConfig::default());
    let y0 = volume.center_of_mass().y;
    let g = 9.8;
    let n = 10;
    for _ in 0..n {
        step(&mut volume, Vec3::new(0.0, -g, 0.0));
    }

    let n = n as f32;
    let expected = y0 - g * TICK * TICK * n * (n + 1.0) / 2.0;
    let y = volume.center_of_mass().y;
    assert!((y - expected).abs() < 1e-3, "y={y}, expected={expected}");

    // A rigid translation leaves the shape intact.
    let rest = volume.mesh().average_edge_length().unwrap();
    for e in volume.mesh().edges() {
        let [a, b] = e.indices;
        let d = volume.points()[a as usize]
            .position
            .distance(volume.points()[b as usize].position);
        assert!((d - rest).abs() < 1e-3);
    }
}

#[test]
fn global_force_overrides_gravity() {
    let mut volume = unit_tetrahedron(VolumeConfig::interactive());
    volume.set_global_force(Some(Vec3::new(2.0, 0.0, 0.0)));
    let x0 = volume.center_of_mass().x;
    for _ in 0..5 {
        step(&mut volume, Vec3::new(0.0, -9.8, 0.0));
    }
    let c = volume.center_of_mass();
    assert!(c.x > x0);
    assert!(c.y.abs() < 1e-4);
}

#[test]
fn pinned_point_never_moves() {
    let mut mesh = TetrahedralMesh::new();
    mesh.add_point(Vec3::new(0.0, 1.0, 0.0), 0.0);
    mesh.add_point(Vec3::ZERO, 1.0);
    mesh.add_point(Vec3::X, 1.0);
    mesh.add_point(Vec3::Z, 1.0);
    mesh.add_tetrahedron(1, 2, 3, 0);
    mesh.setup().unwrap();

    let mut volume = SoftVolume::new(mesh, VolumeConfig::interactive()).unwrap();
    for _ in 0..10 {
        step(&mut volume, Vec3::new(0.0, -9.8, 0.0));
    }
    let pinned = &volume.points()[0];
    assert_eq!(pinned.position, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(pinned.velocity, Vec3::ZERO);

    // The free points swing down from it.
    let free_y: f32 = volume.points()[1..].iter().map(|p| p.position.y).sum::<f32>() / 3.0;
    assert!(free_y < 0.0, "free points at mean y={free_y}");
}

#[test]
fn shape_match_restores_rest_volume() {
    let config = VolumeConfig {
        restore_factor: 1.0,
        stretch_factor: 1.0,
        ..Default::default()
    };
    let mut volume = unit_tetrahedron(config);
    let rest = current_volume(&volume);

    volume.points_mut()[0].position *= 0.8;
    assert!((current_volume(&volume) - rest).abs() > 1e-3);

    volume.shape_match(TICK);
    let restored = current_volume(&volume);
    assert!(
        (restored - rest).abs() < 1e-3 * rest.abs().max(1.0),
        "volume {restored} vs rest {rest}"
    );
}

#[test]
fn flattened_tetrahedron_regains_volume() {
    let config = VolumeConfig {
        restore_factor: 1.0,
        stretch_factor: 1.0,
        ..Default::default()
    };
    let mut volume = unit_tetrahedron(config);
    let rest = current_volume(&volume);

    for p in volume.points_mut() {
        p.position.y = 0.0;
    }
    assert!(current_volume(&volume).abs() < 1e-6);
    assert!(volume.deformed_matrix().determinant() > 0.5);

    volume.shape_match(TICK);
    let restored = current_volume(&volume);
    assert!((restored - rest).abs() < 1e-3, "volume {restored} vs rest {rest}");
}

#[test]
fn inverted_tetrahedron_turns_right_side_out() {
    let config = VolumeConfig {
        restore_factor: 1.0,
        stretch_factor: 1.0,
        auto_freezing: false,
        ..Default::default()
    };
    let mut volume = unit_tetrahedron(config);
    let rest = current_volume(&volume);

    for p in volume.points_mut() {
        p.position.x = -p.position.x;
    }
    assert!(current_volume(&volume) * rest < 0.0);

    for _ in 0..10 {
        volume.advance(Vec3::ZERO, TICK);
    }
    let restored = current_volume(&volume);
    assert!((restored - rest).abs() < 1e-2 * rest.abs(), "volume {restored} vs rest {rest}");
}

#[test]
fn non_finite_factors_are_ignored() {
    let mut volume = unit_tetrahedron(VolumeConfig::default());
    let before = volume.config().clone();

    volume.set_restore_factor(f32::NAN);
    volume.set_stretch_factor(f32::INFINITY);
    volume.set_kinetic_friction(f32::NAN);
    volume.set_friction(f32::NEG_INFINITY);
    assert_eq!(volume.config(), &before);
    assert!(volume.points().iter().all(|p| p.friction.is_finite()));

    volume.points_mut()[0].position *= 0.8;
    volume.advance(Vec3::new(0.0, -9.8, 0.0), TICK);
    assert!(volume.points().iter().all(|p| p.position.is_finite()));
}

#[test]
fn zero_restore_skips_shape_matching() {
    let config = VolumeConfig {
        restore_factor: 0.0,
        ..Default::default()
    };
    let mut volume = unit_tetrahedron(config);
    volume.points_mut()[0].position = Vec3::ZERO;
    let before: Vec<Vec3> = volume.points().iter().map(|p| p.position).collect();
    volume.shape_match(TICK);
    let after: Vec<Vec3> = volume.points().iter().map(|p| p.position).collect();
    assert_eq!(before, after);
}

#[test]
fn kinetic_energy_sums_points() {
    let mut volume = unit_tetrahedron(VolumeConfig::default());
    for p in volume.points_mut() {
        p.velocity = Vec3::new(0.0, 2.0, 0.0);
    }
    // 4 points · ½ · 1 kg · 4 m²/s²
    assert!((volume.kinetic_energy() - 8.0).abs() < 1e-5);
}

// ─── Freezing ─────────────────────────────────────────────────

#[test]
fn freeze_tracker_transitions() {
    let mut tracker = FreezeTracker::new();
    assert_eq!(tracker.update(0.1, 0.2, 1.0, 0.5, true), None);
    assert_eq!(tracker.update(0.1, 0.2, 1.0, 0.5, true), None);
    // Energy spike resets the timer.
    assert_eq!(tracker.update(5.0, 0.2, 1.0, 0.5, true), None);
    assert_eq!(tracker.timer(), 0.0);
    assert_eq!(tracker.update(0.1, 0.3, 1.0, 0.5, true), None);
    assert_eq!(
        tracker.update(0.1, 0.3, 1.0, 0.5, true),
        Some(FreezeState::Frozen)
    );
    assert!(tracker.is_frozen());
    assert!(tracker.wake());
    assert!(!tracker.wake());
}

#[test]
fn resting_volume_freezes_then_wakes_on_impulse() {
    let mut volume = unit_tetrahedron(VolumeConfig::default());
    for _ in 0..20 {
        step(&mut volume, Vec3::ZERO);
    }
    assert_eq!(volume.freeze_state(), FreezeState::Active);

    for _ in 0..20 {
        step(&mut volume, Vec3::ZERO);
    }
    assert_eq!(volume.freeze_state(), FreezeState::Frozen);

    // Frozen volumes ignore gravity.
    let before: Vec<Vec3> = volume.points().iter().map(|p| p.position).collect();
    assert!(!volume.advance(Vec3::new(0.0, -9.8, 0.0), TICK));
    let after: Vec<Vec3> = volume.points().iter().map(|p| p.position).collect();
    assert_eq!(before, after);

    volume.apply_impulse(PointId(0), Vec3::X).unwrap();
    assert_eq!(volume.freeze_state(), FreezeState::Active);
    assert!(volume.points()[0].velocity.x > 0.0);
}

#[test]
fn add_force_wakes_and_is_consumed() {
    let mut volume = unit_tetrahedron(VolumeConfig::default());
    for _ in 0..40 {
        step(&mut volume, Vec3::ZERO);
    }
    assert!(volume.is_frozen());

    volume.add_force(PointId(1), Vec3::new(0.0, 50.0, 0.0)).unwrap();
    assert!(!volume.is_frozen());
    volume.apply_forces(Vec3::ZERO, TICK);
    assert!(volume.points()[1].velocity.y > 0.9);
    assert!(volume.points().iter().all(|p| p.force == Vec3::ZERO));
}

#[test]
fn disabled_auto_freezing_never_freezes() {
    let mut volume = unit_tetrahedron(VolumeConfig::interactive());
    for _ in 0..200 {
        step(&mut volume, Vec3::ZERO);
    }
    assert!(!volume.is_frozen());
    assert_eq!(volume.freeze_timer(), 0.0);
}

#[test]
fn restart_clears_dynamic_state() {
    let mut volume = unit_tetrahedron(VolumeConfig::default());
    for _ in 0..40 {
        step(&mut volume, Vec3::ZERO);
    }
    assert!(volume.is_frozen());
    volume.points_mut()[2].velocity = Vec3::ONE;
    volume.restart();
    assert!(!volume.is_frozen());
    assert!(volume.points().iter().all(|p| p.velocity == Vec3::ZERO));
}

#[test]
fn impulse_on_missing_point_fails() {
    let mut volume = unit_tetrahedron(VolumeConfig::default());
    let err = volume.apply_impulse(PointId(9), Vec3::X).unwrap_err();
    assert!(matches!(
        err,
        PartixError::IndexOutOfRange { kind: "point", index: 9, len: 4 }
    ));
}

// ─── Deformed matrix ──────────────────────────────────────────

fn assert_mat4_near(a: Mat4, b: Mat4, tol: f32) {
    let (a, b) = (a.to_cols_array(), b.to_cols_array());
    for (x, y) in a.iter().zip(&b) {
        assert!((x - y).abs() < tol, "{a:?} vs {b:?}");
    }
}

#[test]
fn deformed_matrix_is_identity_at_rest() {
    let volume = unit_tetrahedron(VolumeConfig::default());
    assert_mat4_near(volume.deformed_matrix(), Mat4::IDENTITY, 1e-4);
}

#[test]
fn deformed_matrix_tracks_teleport_and_rotation() {
    let mut volume = unit_tetrahedron(VolumeConfig::default());
    let offset = Vec3::new(3.0, 5.0, -1.0);
    volume.teleport(offset);
    assert_mat4_near(volume.deformed_matrix(), Mat4::from_translation(offset), 1e-4);
    assert!(volume
        .points()
        .iter()
        .all(|p| (p.position - p.source_position).distance(offset) < 1e-5));

    let rotation = Quat::from_rotation_y(0.6);
    for p in volume.points_mut() {
        p.position = rotation * p.source_position + offset;
    }
    let expected = Mat4::from_rotation_translation(rotation, offset);
    assert_mat4_near(volume.deformed_matrix(), expected, 1e-3);
}

#[test]
fn regularize_recentres_rest_pose() {
    let mesh = box_block(1, 1, 1, 2.0, 1.0).unwrap();
    let mut volume = SoftVolume::new(mesh, VolumeConfig::default()).unwrap();
    let removed = volume.regularize();
    assert!(removed.distance(Vec3::ONE) < 1e-5);

    let c0 = volume
        .points()
        .iter()
        .map(|p| p.source_position)
        .sum::<Vec3>()
        / volume.points().len() as f32;
    assert!(c0.length() < 1e-5);

    // World positions are unchanged, so the transform carries the offset.
    let m = volume.deformed_matrix();
    assert!(m.w_axis.truncate().distance(Vec3::ONE) < 1e-4);
}
