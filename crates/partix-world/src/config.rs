//! World configuration.
//!
//! Session-wide parameters: step length, gravity, the Denman–Beavers
//! iteration count, and the defaults new volumes are created with.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use partix_solver::VolumeConfig;
use partix_types::constants;
use partix_types::{PartixError, PartixResult};

/// Configuration for a [`World`](crate::World).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Step length used by `World::step` (seconds).
    pub tick: f32,

    /// Gravity acceleration (m/s²) for volumes without a global force.
    pub gravity: Vec3,

    /// Denman–Beavers iterations per matrix square root.
    pub sqrt_iterations: u32,

    /// Defaults for volumes built from this config.
    pub volume: VolumeConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tick: constants::DEFAULT_TICK,
            gravity: Vec3::new(0.0, -constants::GRAVITY, 0.0),
            sqrt_iterations: constants::SQRT_ITERATIONS,
            volume: VolumeConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Zero-gravity config, handy for isolating shape matching.
    pub fn weightless() -> Self {
        Self {
            gravity: Vec3::ZERO,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> PartixResult<()> {
        if !(self.tick.is_finite() && self.tick > 0.0) {
            return Err(PartixError::InvalidConfig(format!(
                "tick must be positive and finite, got {}",
                self.tick
            )));
        }
        if !self.gravity.is_finite() {
            return Err(PartixError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if self.sqrt_iterations == 0 {
            return Err(PartixError::InvalidConfig(
                "sqrt_iterations must be at least 1".into(),
            ));
        }
        self.volume.validate()
    }
}
