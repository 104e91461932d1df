//! Scenario runner — steps a scenario's world and collects metrics.

use std::time::Instant;

use partix_math::geometry::tetrahedron_volume;
use partix_solver::SoftVolume;
use partix_types::PartixResult;
use partix_world::Body;

use crate::metrics::ScenarioMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Runs benchmark scenarios and collects metrics.
pub struct ScenarioRunner;

impl ScenarioRunner {
    /// Runs a single scenario to completion.
    ///
    /// The scenario's world is left in its final state.
    pub fn run(scenario: &mut Scenario) -> PartixResult<ScenarioMetrics> {
        let mut step_times: Vec<f64> = Vec::with_capacity(scenario.timesteps as usize);
        let mut total_contacts: u64 = 0;
        let mut max_penetration: f32 = 0.0;

        let total_start = Instant::now();
        for _ in 0..scenario.timesteps {
            let start = Instant::now();
            let report = scenario.world.update(scenario.dt)?;
            step_times.push(start.elapsed().as_secs_f64());
            total_contacts += report.contacts.resolved_count as u64;
            max_penetration = max_penetration.max(report.contacts.max_penetration);
        }
        let total_wall_time = total_start.elapsed().as_secs_f64();

        let avg_step = if step_times.is_empty() {
            0.0
        } else {
            step_times.iter().sum::<f64>() / step_times.len() as f64
        };
        let min_step = step_times.iter().copied().fold(f64::MAX, f64::min);
        let max_step = step_times.iter().copied().fold(0.0, f64::max);

        let world = &scenario.world;
        let volumes = move || world.bodies().iter().filter_map(Body::as_volume);
        let metrics = ScenarioMetrics {
            scenario: scenario.kind.name().to_string(),
            point_count: volumes().map(|v| v.points().len()).sum(),
            tetrahedron_count: volumes().map(|v| v.mesh().tetrahedra().len()).sum(),
            total_wall_time,
            timesteps: scenario.timesteps,
            avg_step_time: avg_step,
            min_step_time: if step_times.is_empty() { 0.0 } else { min_step },
            max_step_time: max_step,
            final_kinetic_energy: world.kinetic_energy() as f64,
            total_contacts,
            max_penetration,
            max_volume_drift: volumes().map(volume_drift).fold(0.0, f32::max),
            frozen_volumes: volumes().filter(|v| v.is_frozen()).count() as u32,
        };

        tracing::info!(
            scenario = %metrics.scenario,
            timesteps = metrics.timesteps,
            wall_time = metrics.total_wall_time,
            "scenario finished"
        );
        Ok(metrics)
    }

    /// Builds and runs every scenario.
    pub fn run_all() -> PartixResult<Vec<ScenarioMetrics>> {
        ScenarioKind::all()
            .iter()
            .map(|&kind| Self::run(&mut Scenario::from_kind(kind)?))
            .collect()
    }
}

/// `|V − V₀| / V₀` over the whole volume.
fn volume_drift(volume: &SoftVolume) -> f32 {
    let rest = volume.rest_shape().total_rest_volume();
    if rest <= 0.0 {
        return 0.0;
    }
    let points = volume.points();
    let current: f32 = volume
        .mesh()
        .tetrahedra()
        .iter()
        .map(|t| {
            let [a, b, c, d] = t.indices.map(|i| points[i as usize].position);
            tetrahedron_volume(a, b, c, d)
        })
        .sum();
    (current - rest).abs() / rest
}
