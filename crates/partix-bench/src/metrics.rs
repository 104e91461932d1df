//! Scenario metrics — data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Points over all volumes.
    pub point_count: usize,
    /// Tetrahedra over all volumes.
    pub tetrahedron_count: usize,
    /// Total wall-clock time (seconds).
    pub total_wall_time: f64,
    /// Number of steps executed.
    pub timesteps: u32,
    /// Average wall-clock time per step (seconds).
    pub avg_step_time: f64,
    /// Minimum step time.
    pub min_step_time: f64,
    /// Maximum step time.
    pub max_step_time: f64,
    /// Kinetic energy after the last step.
    pub final_kinetic_energy: f64,
    /// Plane contacts resolved over the whole run.
    pub total_contacts: u64,
    /// Deepest plane penetration seen during the run (meters).
    pub max_penetration: f32,
    /// Largest relative deviation of a volume from its rest volume at
    /// the end of the run.
    pub max_volume_drift: f32,
    /// Volumes frozen after the last step.
    pub frozen_volumes: u32,
}

impl ScenarioMetrics {
    /// CSV header row.
    pub fn to_csv_header() -> String {
        "scenario,point_count,tetrahedron_count,timesteps,total_wall_time_s,avg_step_ms,min_step_ms,max_step_ms,final_ke,total_contacts,max_penetration,max_volume_drift,frozen_volumes".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{:.6},{:.4},{:.4},{:.4},{:.6e},{},{:.6},{:.6},{}",
            self.scenario,
            self.point_count,
            self.tetrahedron_count,
            self.timesteps,
            self.total_wall_time,
            self.avg_step_time * 1000.0,
            self.min_step_time * 1000.0,
            self.max_step_time * 1000.0,
            self.final_kinetic_energy,
            self.total_contacts,
            self.max_penetration,
            self.max_volume_drift,
            self.frozen_volumes,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[ScenarioMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
