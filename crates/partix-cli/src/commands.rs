//! CLI command implementations.

use std::path::Path;

use partix_bench::metrics::ScenarioMetrics;
use partix_bench::runner::ScenarioRunner;
use partix_bench::scenarios::{Scenario, ScenarioKind};
use partix_debug::hooks::{step_with_hooks, InspectionHook};
use partix_debug::snapshot::WorldSnapshot;
use partix_world::{StepReport, World};

use crate::scene::{MeshFile, SceneFile};

/// Prints a one-line summary every `interval` steps.
struct Progress {
    interval: u32,
}

impl InspectionHook for Progress {
    fn on_step_end(&mut self, world: &World, report: &StepReport) {
        if world.timestep() % self.interval == 0 {
            println!(
                "  step {:>6}  t={:>8.3}s  active={}  frozen={}  contacts={:>4}  KE={:.4e}",
                world.timestep(),
                world.sim_time(),
                report.active_volumes,
                report.frozen_volumes,
                report.contacts.resolved_count,
                report.kinetic_energy,
            );
        }
    }

    fn name(&self) -> &str {
        "progress"
    }
}

/// Run a simulation from a scene file.
pub fn simulate(
    config_path: &str,
    steps: u32,
    snapshot_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("partix Simulation");
    println!("─────────────────");
    println!("Scene: {config_path}");

    let path = Path::new(config_path);
    let scene = SceneFile::load(path)?;
    let mut world = scene.build(path.parent().unwrap_or(Path::new(".")))?;
    let tick = world.config().tick;

    println!(
        "Bodies: {} ({} volumes), tick {tick}s, {steps} steps",
        world.bodies().len(),
        world.volume_ids().len()
    );
    println!();

    let mut progress = Progress {
        interval: (steps / 10).max(1),
    };
    for _ in 0..steps {
        step_with_hooks(&mut world, tick, &mut [&mut progress])?;
    }
    progress.on_simulation_end();

    println!();
    println!("Sim time:   {:.3}s", world.sim_time());
    println!("Final KE:   {:.6e}", world.kinetic_energy());

    if let Some(out) = snapshot_path {
        WorldSnapshot::capture(&world).write_to(out)?;
        println!("Snapshot written to: {out}");
    }
    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(
    scenario_name: &str,
    output_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("partix Benchmark Suite");
    println!("══════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        let kind = scenario_name.parse::<ScenarioKind>().map_err(|e| {
            let available: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
            format!("{e}. Available: {}, all", available.join(", "))
        })?;
        vec![kind]
    };

    let mut all_metrics = Vec::new();
    for &kind in &scenarios {
        let mut scenario = Scenario::from_kind(kind)?;
        println!(
            "Running: {} ({} volumes, {} steps)",
            kind.name(),
            scenario.world.volume_ids().len(),
            scenario.timesteps,
        );

        let metrics = ScenarioRunner::run(&mut scenario)
            .map_err(|e| format!("Benchmark failed: {e}"))?;

        println!("  Points:        {}", metrics.point_count);
        println!("  Wall time:     {:.3}s", metrics.total_wall_time);
        println!("  Avg step:      {:.3}ms", metrics.avg_step_time * 1000.0);
        println!("  Final KE:      {:.6e}", metrics.final_kinetic_energy);
        println!("  Contacts:      {}", metrics.total_contacts);
        println!("  Volume drift:  {:.2}%", metrics.max_volume_drift * 100.0);
        println!();

        all_metrics.push(metrics);
    }

    let csv = ScenarioMetrics::to_csv(&all_metrics);
    if let Some(path) = output_path {
        std::fs::write(path, &csv)?;
        println!("Results written to: {path}");
    } else {
        println!("CSV Output:");
        println!("{csv}");
    }
    Ok(())
}

/// Inspect a world snapshot.
pub fn inspect(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("partix Snapshot Inspector");
    println!("────────────────────────");
    println!();

    let snapshot = WorldSnapshot::read_from(path)?;

    println!("Timestep:     {}", snapshot.timestep);
    println!("Sim time:     {:.4}s", snapshot.sim_time);
    println!("Volumes:      {}", snapshot.volumes.len());
    println!("Points:       {}", snapshot.point_count());

    for volume in &snapshot.volumes {
        let n = volume.point_count();
        let ys = volume.positions.iter().skip(1).step_by(3).copied();
        let min_y = ys.clone().fold(f32::INFINITY, f32::min);
        let max_y = ys.fold(f32::NEG_INFINITY, f32::max);
        let max_speed = (0..n)
            .filter_map(|i| volume.velocity(i))
            .map(|v| v.length())
            .fold(0.0f32, f32::max);

        println!();
        println!("Body {}{}", volume.body, if volume.frozen { " (frozen)" } else { "" });
        println!("  Points:     {n}");
        if n > 0 {
            println!("  Y range:    [{min_y:.4}, {max_y:.4}]");
            println!("  Max speed:  {max_speed:.4} m/s");
        }
    }
    Ok(())
}

/// Validate a scene or mesh file.
pub fn validate(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("partix Validator");
    println!("────────────────");
    println!();

    let file = Path::new(path);
    match file.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            println!("Validating scene: {path}");
            let scene = SceneFile::load(file)?;
            match scene.build(file.parent().unwrap_or(Path::new("."))) {
                Ok(world) => println!(
                    "✅ Scene is valid ({} bodies, {} volumes).",
                    world.bodies().len(),
                    world.volume_ids().len()
                ),
                Err(e) => println!("❌ Scene validation failed: {e}"),
            }
        }
        Some("json") => {
            println!("Validating mesh: {path}");
            match MeshFile::load(file).and_then(MeshFile::into_mesh) {
                Ok(mesh) => println!(
                    "✅ Mesh is valid ({} points, {} tetrahedra, {} faces).",
                    mesh.points().len(),
                    mesh.tetrahedra().len(),
                    mesh.faces().len()
                ),
                Err(e) => println!("❌ Mesh validation failed: {e}"),
            }
        }
        _ => println!("Unsupported file format. Use .toml (scene) or .json (mesh)."),
    }
    Ok(())
}
