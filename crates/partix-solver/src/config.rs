//! Soft volume configuration.
//!
//! Parameters that control one volume's behaviour: shape-matching
//! stiffness, drag, plane friction and the freeze thresholds.

use serde::{Deserialize, Serialize};

use partix_types::constants;
use partix_types::{PartixError, PartixResult};

/// Configuration for a [`SoftVolume`](crate::SoftVolume).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Fraction of the distance to the shape-matching goal recovered per
    /// step (0.0 = no restoration, 1.0 = snap to goal).
    pub restore_factor: f32,

    /// Rigidity share of the goal transform. 1.0 uses the pure rotation,
    /// 0.0 the volume-preserving linear fit.
    pub stretch_factor: f32,

    /// Tangential velocity damping rate (1/s) while touching a plane.
    pub kinetic_friction: f32,

    /// Velocity-proportional drag coefficient.
    pub speed_drag_coefficient: f32,

    /// Kinetic energy (J) under which the freeze timer runs.
    pub freeze_threshold_energy: f32,

    /// Seconds of sustained low energy before the volume freezes.
    pub freeze_duration: f32,

    /// Whether the volume may freeze at all.
    pub auto_freezing: bool,

    /// Coulomb friction assigned to every point on construction.
    /// `None` keeps the per-point values from the mesh.
    pub point_friction: Option<f32>,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            restore_factor: constants::DEFAULT_RESTORE_FACTOR,
            stretch_factor: constants::DEFAULT_STRETCH_FACTOR,
            kinetic_friction: constants::KINETIC_FRICTION,
            speed_drag_coefficient: constants::SPEED_DRAG_COEFFICIENT,
            freeze_threshold_energy: constants::FREEZE_THRESHOLD_ENERGY,
            freeze_duration: constants::FREEZE_DURATION,
            auto_freezing: true,
            point_friction: None,
        }
    }
}

impl VolumeConfig {
    /// Config for a body under direct user manipulation: never freezes.
    pub fn interactive() -> Self {
        Self {
            auto_freezing: false,
            ..Default::default()
        }
    }

    /// Stiff, nearly rigid body.
    pub fn rigid() -> Self {
        Self {
            restore_factor: 1.0,
            stretch_factor: 1.0,
            ..Default::default()
        }
    }

    /// Rejects factors outside `[0, 1]` and negative or non-finite rates.
    pub fn validate(&self) -> PartixResult<()> {
        unit_interval("restore_factor", self.restore_factor)?;
        unit_interval("stretch_factor", self.stretch_factor)?;
        non_negative("kinetic_friction", self.kinetic_friction)?;
        non_negative("speed_drag_coefficient", self.speed_drag_coefficient)?;
        non_negative("freeze_threshold_energy", self.freeze_threshold_energy)?;
        non_negative("freeze_duration", self.freeze_duration)?;
        if let Some(f) = self.point_friction {
            non_negative("point_friction", f)?;
        }
        Ok(())
    }
}

fn unit_interval(name: &str, value: f32) -> PartixResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PartixError::InvalidConfig(format!(
            "{name} must be in [0, 1], got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f32) -> PartixResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PartixError::InvalidConfig(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}
