//! Benchmark scenarios — procedural meshes, planes and config for each case.
//!
//! Three canonical scenarios for regression testing:
//! 1. **Drop tetrahedron** — A single tetrahedron falls onto the ground
//! 2. **Drop block** — A subdivided block lands on a rough ground
//! 3. **Room pile** — Several bodies tossed around inside a closed room

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use partix_contact::BoundingPlane;
use partix_mesh::generators::{box_block, regular_tetrahedron};
use partix_mesh::TetrahedralMesh;
use partix_solver::VolumeConfig;
use partix_types::{BodyId, PartixError, PartixResult, PointId};
use partix_world::{World, WorldConfig};

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Unit tetrahedron dropped from 2 m onto the ground.
    DropTetrahedron,
    /// 3×3×3 block dropped onto a ground with kinetic friction.
    DropBlock,
    /// Mixed bodies kicked around inside a 4 m room.
    RoomPile,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::DropTetrahedron,
            ScenarioKind::DropBlock,
            ScenarioKind::RoomPile,
        ]
    }

    /// Returns a human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::DropTetrahedron => "drop_tetrahedron",
            ScenarioKind::DropBlock => "drop_block",
            ScenarioKind::RoomPile => "room_pile",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = PartixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| PartixError::InvalidConfig(format!("unknown scenario '{s}'")))
    }
}

/// A fully specified benchmark scenario.
pub struct Scenario {
    pub kind: ScenarioKind,
    /// Populated world, ready to step.
    pub world: World,
    /// Number of steps to simulate.
    pub timesteps: u32,
    /// Step length (seconds).
    pub dt: f32,
}

impl Scenario {
    /// A unit tetrahedron with 1 kg points, 2 m above the ground, for 3
    /// seconds at the default tick.
    pub fn drop_tetrahedron() -> PartixResult<Self> {
        let mut world = World::new(WorldConfig::default())?;
        world.add_plane(BoundingPlane::ground(0.0));
        add_at(&mut world, regular_tetrahedron(1.0, 1.0)?, Vec3::Y * 2.0)?;

        Ok(Self {
            kind: ScenarioKind::DropTetrahedron,
            world,
            timesteps: 150,
            dt: world_tick(),
        })
    }

    /// A 0.75 m block of 3×3×3 cells, tilted by an off-centre push, on a
    /// ground with kinetic friction.
    pub fn drop_block() -> PartixResult<Self> {
        let mut config = WorldConfig::default();
        config.volume.kinetic_friction = 2.0;
        config.volume.point_friction = Some(0.5);
        let mut world = World::new(config)?;
        world.add_plane(BoundingPlane::ground(0.0));

        let mesh = box_block(3, 3, 3, 0.25, 0.1)?;
        let block = add_at(&mut world, mesh, Vec3::new(-0.375, 1.0, -0.375))?;
        if let Some(v) = world.volume_mut(block) {
            v.apply_impulse(PointId(0), Vec3::new(0.3, 0.0, 0.1))?;
        }

        Ok(Self {
            kind: ScenarioKind::DropBlock,
            world,
            timesteps: 200,
            dt: world_tick(),
        })
    }

    /// Two tetrahedra and two blocks thrown around a closed room.
    pub fn room_pile() -> PartixResult<Self> {
        let config = WorldConfig {
            volume: VolumeConfig::interactive(),
            ..Default::default()
        };
        let mut world = World::new(config)?;
        world.add_room(2.0)?;

        let bodies = [
            add_at(&mut world, regular_tetrahedron(0.8, 1.0)?, Vec3::new(-1.0, 0.5, 0.0))?,
            add_at(&mut world, regular_tetrahedron(0.8, 1.0)?, Vec3::new(1.0, 1.0, 0.5))?,
            add_at(&mut world, box_block(2, 2, 2, 0.3, 0.25)?, Vec3::new(-0.3, -1.0, -0.3))?,
            add_at(&mut world, box_block(2, 1, 2, 0.3, 0.25)?, Vec3::new(0.5, 0.2, -1.2))?,
        ];
        let kicks = [
            Vec3::new(4.0, 1.0, 0.0),
            Vec3::new(-3.0, 0.0, -2.0),
            Vec3::new(0.0, 5.0, 1.0),
            Vec3::new(-1.0, 2.0, 3.0),
        ];
        for (id, kick) in bodies.into_iter().zip(kicks) {
            if let Some(v) = world.volume_mut(id) {
                v.apply_impulse(PointId(0), kick)?;
            }
        }

        Ok(Self {
            kind: ScenarioKind::RoomPile,
            world,
            timesteps: 250,
            dt: world_tick(),
        })
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind) -> PartixResult<Self> {
        match kind {
            ScenarioKind::DropTetrahedron => Self::drop_tetrahedron(),
            ScenarioKind::DropBlock => Self::drop_block(),
            ScenarioKind::RoomPile => Self::room_pile(),
        }
    }

    /// Overrides the number of steps.
    pub fn with_timesteps(mut self, timesteps: u32) -> Self {
        self.timesteps = timesteps;
        self
    }
}

fn world_tick() -> f32 {
    WorldConfig::default().tick
}

fn add_at(world: &mut World, mesh: TetrahedralMesh, offset: Vec3) -> PartixResult<BodyId> {
    let id = world.add_mesh(mesh)?;
    if let Some(v) = world.volume_mut(id) {
        v.teleport(offset);
    }
    Ok(id)
}
