//! Integration tests for partix-bench.

use partix_bench::metrics::ScenarioMetrics;
use partix_bench::runner::ScenarioRunner;
use partix_bench::scenarios::{Scenario, ScenarioKind};

// ─── Scenario Tests ───────────────────────────────────────────

#[test]
fn drop_tetrahedron_setup() {
    let s = Scenario::drop_tetrahedron().unwrap();
    assert_eq!(s.kind, ScenarioKind::DropTetrahedron);
    assert_eq!(s.world.bodies().len(), 2);
    assert_eq!(s.world.volume_ids().len(), 1);
}

#[test]
fn drop_block_setup() {
    let s = Scenario::drop_block().unwrap();
    let id = s.world.volume_ids()[0];
    let v = s.world.volume(id).unwrap();
    assert_eq!(v.points().len(), 64); // 4×4×4
    assert_eq!(v.mesh().tetrahedra().len(), 135); // 27 cells × 5
    assert!(v.points().iter().all(|p| p.friction == 0.5));
}

#[test]
fn room_pile_setup() {
    let s = Scenario::room_pile().unwrap();
    assert_eq!(s.world.bodies().len(), 10); // 6 walls + 4 volumes
    assert_eq!(s.world.volume_ids().len(), 4);
}

#[test]
fn all_scenarios() {
    assert_eq!(ScenarioKind::all().len(), 3);
    for &kind in ScenarioKind::all() {
        assert_eq!(kind.name().parse::<ScenarioKind>().unwrap(), kind);
        assert_eq!(Scenario::from_kind(kind).unwrap().kind, kind);
    }
    assert!("sphere_drape".parse::<ScenarioKind>().is_err());
}

// ─── Runner Tests ─────────────────────────────────────────────

#[test]
fn run_drop_tetrahedron() {
    let mut scenario = Scenario::drop_tetrahedron().unwrap();
    let metrics = ScenarioRunner::run(&mut scenario).unwrap();

    assert_eq!(metrics.scenario, "drop_tetrahedron");
    assert_eq!(metrics.timesteps, 150);
    assert_eq!(metrics.point_count, 4);
    assert_eq!(metrics.tetrahedron_count, 1);
    assert!(metrics.total_wall_time > 0.0);
    assert!(metrics.total_contacts > 0);
    assert!(metrics.max_volume_drift < 0.2);
    assert!(metrics.min_step_time <= metrics.avg_step_time);
    assert!(metrics.avg_step_time <= metrics.max_step_time);
}

#[test]
fn short_run_stays_airborne() {
    let mut scenario = Scenario::drop_tetrahedron().unwrap().with_timesteps(5);
    let metrics = ScenarioRunner::run(&mut scenario).unwrap();
    assert_eq!(metrics.timesteps, 5);
    assert_eq!(metrics.total_contacts, 0);
    assert!(metrics.final_kinetic_energy > 0.0);
    assert_eq!(scenario.world.timestep(), 5);
}

#[test]
fn run_room_pile_stays_inside() {
    let mut scenario = Scenario::room_pile().unwrap().with_timesteps(100);
    let metrics = ScenarioRunner::run(&mut scenario).unwrap();
    assert!(metrics.total_contacts > 0);
    // Auto-freezing is off in this scenario.
    assert_eq!(metrics.frozen_volumes, 0);

    for id in scenario.world.volume_ids() {
        for p in scenario.world.volume(id).unwrap().points() {
            assert!(p.position.abs().max_element() < 2.0 + 1e-3);
        }
    }
}

#[test]
fn run_all_covers_every_scenario() {
    let metrics = ScenarioRunner::run_all().unwrap();
    let names: Vec<_> = metrics.iter().map(|m| m.scenario.as_str()).collect();
    assert_eq!(names, vec!["drop_tetrahedron", "drop_block", "room_pile"]);
}

// ─── Metrics Tests ────────────────────────────────────────────

#[test]
fn metrics_csv() {
    let mut scenario = Scenario::drop_tetrahedron().unwrap().with_timesteps(3);
    let m = ScenarioRunner::run(&mut scenario).unwrap();
    let csv = ScenarioMetrics::to_csv(&[m.clone(), m]);

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    let columns = lines[0].split(',').count();
    assert_eq!(columns, 13);
    assert!(lines[1].starts_with("drop_tetrahedron,4,1,3,"));
    assert_eq!(lines[1].split(',').count(), columns);
}

#[test]
fn metrics_json() {
    let mut scenario = Scenario::drop_tetrahedron().unwrap().with_timesteps(1);
    let m = ScenarioRunner::run(&mut scenario).unwrap();
    let json = serde_json::to_string(&m).unwrap();
    let back: ScenarioMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(back.scenario, m.scenario);
    assert_eq!(back.point_count, 4);
}
