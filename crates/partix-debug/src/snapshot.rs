//! World snapshot serialization for replay and debugging.
//!
//! A snapshot captures the point state of every soft volume at one step,
//! enabling deterministic replay and diff-based debugging. Planes and
//! rest shapes are not captured: they never change during a run.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use partix_types::{BodyId, PartixError, PartixResult};
use partix_world::{Body, World};

/// Point state of one soft volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSnapshot {
    /// Arena index of the volume.
    pub body: u32,
    /// Point positions (flat: [x0, y0, z0, x1, y1, z1, ...]).
    pub positions: Vec<f32>,
    /// Point velocities (flat: [vx0, vy0, vz0, ...]).
    pub velocities: Vec<f32>,
    pub frozen: bool,
}

impl VolumeSnapshot {
    #[inline]
    pub fn point_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn position(&self, i: usize) -> Option<Vec3> {
        self.positions.get(i * 3..i * 3 + 3).map(Vec3::from_slice)
    }

    pub fn velocity(&self, i: usize) -> Option<Vec3> {
        self.velocities.get(i * 3..i * 3 + 3).map(Vec3::from_slice)
    }
}

/// Every volume of a world at one step.
///
/// Serialized with `bincode` for compact binary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Steps taken when this snapshot was captured.
    pub timestep: u32,
    /// Simulation time in seconds.
    pub sim_time: f64,
    pub volumes: Vec<VolumeSnapshot>,
}

impl WorldSnapshot {
    /// Captures the current state of every volume in `world`.
    pub fn capture(world: &World) -> Self {
        let volumes = world
            .bodies()
            .iter()
            .enumerate()
            .filter_map(|(i, body)| {
                let volume = body.as_volume()?;
                let points = volume.points();
                let mut positions = Vec::with_capacity(points.len() * 3);
                let mut velocities = Vec::with_capacity(points.len() * 3);
                for p in points {
                    positions.extend_from_slice(&p.position.to_array());
                    velocities.extend_from_slice(&p.velocity.to_array());
                }
                Some(VolumeSnapshot {
                    body: i as u32,
                    positions,
                    velocities,
                    frozen: volume.is_frozen(),
                })
            })
            .collect();

        Self {
            timestep: world.timestep(),
            sim_time: world.sim_time(),
            volumes,
        }
    }

    /// Total number of points over all volumes.
    pub fn point_count(&self) -> usize {
        self.volumes.iter().map(VolumeSnapshot::point_count).sum()
    }

    pub fn volume(&self, body: BodyId) -> Option<&VolumeSnapshot> {
        self.volumes.iter().find(|v| v.body == body.0)
    }

    /// Writes positions and velocities back into the matching volumes.
    ///
    /// A volume captured as active is woken; freezing is left to the
    /// solver. Fails if a body is missing, is not a volume, or has a
    /// different point count.
    pub fn restore(&self, world: &mut World) -> PartixResult<()> {
        for snap in &self.volumes {
            let id = BodyId(snap.body);
            let volume = world
                .body_mut(id)
                .and_then(Body::as_volume_mut)
                .ok_or(PartixError::UnknownBody(id))?;

            let len = volume.points().len();
            if snap.point_count() != len || snap.velocities.len() != snap.positions.len() {
                return Err(PartixError::InvalidMesh(format!(
                    "snapshot of body {} holds {} points, volume has {len}",
                    snap.body,
                    snap.point_count()
                )));
            }

            for (i, p) in volume.points_mut().iter_mut().enumerate() {
                p.position = Vec3::from_slice(&snap.positions[i * 3..]);
                p.velocity = Vec3::from_slice(&snap.velocities[i * 3..]);
            }
            if !snap.frozen {
                volume.wake();
            }
        }
        tracing::debug!(timestep = self.timestep, volumes = self.volumes.len(), "snapshot restored");
        Ok(())
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> PartixResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| PartixError::Serialization(e.to_string()))
    }

    /// Deserializes from binary format.
    pub fn from_bytes(data: &[u8]) -> PartixResult<Self> {
        bincode::deserialize(data)
            .map_err(|e| PartixError::Serialization(format!("snapshot deserialization failed: {e}")))
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> PartixResult<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> PartixResult<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}
