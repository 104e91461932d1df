//! World — body arena and the per-step pipeline.
//!
//! The world owns every body in a flat arena and hands out [`BodyId`]
//! handles. Each `update(dt)` runs, for every volume in registration
//! order:
//!
//! ```text
//! forces → integrate → shape-match      (Active volumes only)
//! collide against every plane           (single pass, frozen volumes too)
//! freeze bookkeeping
//! ```
//!
//! A frozen volume that is pushed by a plane wakes up. Contacts against
//! several planes are resolved one plane after the other, not solved
//! simultaneously.

use std::time::Instant;

use glam::Vec3;

use partix_contact::{resolve_all, BoundingPlane, Collider, ContactResult, FaceGrid, RayHit};
use partix_math::geometry::test_aabb_segment;
use partix_mesh::TetrahedralMesh;
use partix_solver::{FreezeState, SoftVolume};
use partix_telemetry::{EventBus, EventKind, SimulationEvent};
use partix_types::constants::WAKE_IMPULSE_THRESHOLD;
use partix_types::{BodyId, PartixError, PartixResult};

use crate::body::Body;
use crate::config::WorldConfig;
use crate::room::room;

/// Summary of one `update` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Index of the step just taken (0-indexed).
    pub timestep: u32,
    pub dt: f32,
    pub active_volumes: u32,
    pub frozen_volumes: u32,
    /// Plane contacts over all volumes.
    pub contacts: ContactResult,
    /// Total kinetic energy after the step.
    pub kinetic_energy: f32,
    /// Volumes that froze during this step.
    pub froze: Vec<BodyId>,
    /// Volumes woken by a plane contact during this step.
    pub woke: Vec<BodyId>,
}

/// Nearest surface hit of a pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub body: BodyId,
    pub hit: RayHit,
}

/// A simulation session.
pub struct World {
    config: WorldConfig,
    bodies: Vec<Body>,
    timestep: u32,
    sim_time: f64,
    bus: Option<EventBus>,
}

impl World {
    /// Creates an empty world. Fails on an invalid config.
    pub fn new(config: WorldConfig) -> PartixResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bodies: Vec::new(),
            timestep: 0,
            sim_time: 0.0,
            bus: None,
        })
    }

    // ─── Accessors ────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Number of steps taken since creation or the last `restart`.
    #[inline]
    pub fn timestep(&self) -> u32 {
        self.timestep
    }

    /// Simulated seconds since creation or the last `restart`.
    #[inline]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[inline]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    #[inline]
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }

    /// Ids of every volume, in registration order.
    pub fn volume_ids(&self) -> Vec<BodyId> {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_volume())
            .map(|(i, _)| BodyId(i as u32))
            .collect()
    }

    pub fn plane(&self, id: BodyId) -> Option<&BoundingPlane> {
        self.body(id).and_then(Body::as_plane)
    }

    /// The volume behind `id`.
    ///
    /// Asking for a plane as a volume is a caller bug: it asserts in
    /// debug builds and returns `None` otherwise.
    pub fn volume(&self, id: BodyId) -> Option<&SoftVolume> {
        match self.bodies.get(id.index())? {
            Body::Volume(v) => Some(v),
            Body::Plane(_) => {
                debug_assert!(false, "body {} is a plane, not a volume", id.0);
                None
            }
        }
    }

    /// Mutable form of [`volume`](Self::volume), with the same contract.
    pub fn volume_mut(&mut self, id: BodyId) -> Option<&mut SoftVolume> {
        match self.bodies.get_mut(id.index())? {
            Body::Volume(v) => Some(v),
            Body::Plane(_) => {
                debug_assert!(false, "body {} is a plane, not a volume", id.0);
                None
            }
        }
    }

    // ─── Registration ─────────────────────────────────────────

    /// Adds a body and returns its handle.
    pub fn add_body(&mut self, body: impl Into<Body>) -> BodyId {
        let mut body = body.into();
        if let Body::Volume(v) = &mut body {
            v.set_sqrt_iterations(self.config.sqrt_iterations);
        }
        let id = BodyId(self.bodies.len() as u32);
        tracing::debug!(body = id.0, kind = body.kind_name(), "body added");
        self.bodies.push(body);
        id
    }

    pub fn add_plane(&mut self, plane: BoundingPlane) -> BodyId {
        self.add_body(plane)
    }

    pub fn add_volume(&mut self, volume: SoftVolume) -> BodyId {
        self.add_body(volume)
    }

    /// Builds a volume from a set-up mesh with the world's volume
    /// defaults.
    pub fn add_mesh(&mut self, mesh: TetrahedralMesh) -> PartixResult<BodyId> {
        let volume = SoftVolume::new(mesh, self.config.volume.clone())?;
        Ok(self.add_volume(volume))
    }

    /// Adds the six walls of [`room`].
    pub fn add_room(&mut self, half_extent: f32) -> PartixResult<[BodyId; 6]> {
        Ok(room(half_extent)?.map(|wall| self.add_plane(wall)))
    }

    /// Attaches a telemetry bus; events are flushed at the end of every
    /// step. Replaces and returns any previous bus.
    pub fn attach_event_bus(&mut self, bus: EventBus) -> Option<EventBus> {
        self.bus.replace(bus)
    }

    /// Detaches the bus after flushing and finalizing it.
    pub fn detach_event_bus(&mut self) -> Option<EventBus> {
        let mut bus = self.bus.take()?;
        bus.finalize();
        Some(bus)
    }

    pub fn event_bus_mut(&mut self) -> Option<&mut EventBus> {
        self.bus.as_mut()
    }

    // ─── Stepping ─────────────────────────────────────────────

    /// Advances every body by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> PartixResult<StepReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PartixError::InvalidConfig(format!(
                "step length must be positive and finite, got {dt}"
            )));
        }
        let start = Instant::now();
        let timestep = self.timestep;
        self.emit(timestep, EventKind::StepBegin {
            sim_time: self.sim_time,
            dt,
        });

        let planes: Vec<BoundingPlane> = self.bodies.iter().filter_map(|b| b.as_plane().copied()).collect();
        let colliders: Vec<&dyn Collider> = planes.iter().map(|p| p as &dyn Collider).collect();
        let gravity = self.config.gravity;
        let mut report = StepReport {
            timestep,
            dt,
            ..Default::default()
        };
        let mut events = Vec::new();
        let mut energy = partix_math::CompensatedSum::new();

        for (i, body) in self.bodies.iter_mut().enumerate() {
            let Body::Volume(volume) = body else {
                continue;
            };
            let id = BodyId(i as u32);

            if volume.advance(gravity, dt) {
                report.active_volumes += 1;
            } else {
                report.frozen_volumes += 1;
            }

            let kinetic_friction = volume.config().kinetic_friction;
            let contacts = resolve_all(&colliders, volume.points_mut(), kinetic_friction, dt);

            // Projection distance counts as speed so resting contact on a
            // moved plane still wakes a frozen volume.
            let push = contacts.max_impulse.max(contacts.max_penetration / dt);
            if volume.is_frozen() && push > WAKE_IMPULSE_THRESHOLD {
                volume.wake();
                report.woke.push(id);
                events.push(EventKind::FreezeChanged {
                    body: id.0,
                    frozen: false,
                });
            }

            if volume.update_freeze(dt) == Some(FreezeState::Frozen) {
                report.froze.push(id);
                events.push(EventKind::FreezeChanged {
                    body: id.0,
                    frozen: true,
                });
            }

            let kinetic = volume.kinetic_energy();
            energy.add(kinetic);

            if !contacts.is_empty() {
                events.push(EventKind::Contacts {
                    body: id.0,
                    resolved_count: contacts.resolved_count,
                    max_penetration: contacts.max_penetration,
                    max_impulse: contacts.max_impulse,
                });
            }
            events.push(EventKind::Energy {
                body: id.0,
                kinetic: kinetic as f64,
            });
            report.contacts.merge(&contacts);
        }

        report.kinetic_energy = energy.value();
        self.timestep += 1;
        self.sim_time += dt as f64;

        for kind in events {
            self.emit(timestep, kind);
        }
        self.emit(timestep, EventKind::StepEnd {
            wall_time: start.elapsed().as_secs_f64(),
            active_volumes: report.active_volumes,
            frozen_volumes: report.frozen_volumes,
        });
        if let Some(bus) = self.bus.as_mut() {
            bus.flush();
        }

        tracing::trace!(
            timestep,
            active = report.active_volumes,
            frozen = report.frozen_volumes,
            contacts = report.contacts.resolved_count,
            kinetic_energy = report.kinetic_energy,
            "world step"
        );
        Ok(report)
    }

    /// One step of the configured tick.
    pub fn step(&mut self) -> PartixResult<StepReport> {
        self.update(self.config.tick)
    }

    /// Clears velocities, forces and freeze state of every volume and
    /// resets the step counters. Positions, topology and the body list
    /// are kept.
    pub fn restart(&mut self) {
        for body in &mut self.bodies {
            if let Body::Volume(v) = body {
                v.restart();
            }
        }
        self.timestep = 0;
        self.sim_time = 0.0;
        tracing::debug!(bodies = self.bodies.len(), "world restarted");
    }

    // ─── Global parameters ────────────────────────────────────

    /// Gravity for every volume without its own global force.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    pub fn set_tick(&mut self, tick: f32) -> PartixResult<()> {
        if !(tick.is_finite() && tick > 0.0) {
            return Err(PartixError::InvalidConfig(format!(
                "tick must be positive and finite, got {tick}"
            )));
        }
        self.config.tick = tick;
        Ok(())
    }

    /// Sets the restore factor of every registered volume. Non-finite
    /// values are ignored here and by the setters below.
    pub fn set_restore_factor(&mut self, factor: f32) {
        if !factor.is_finite() {
            return;
        }
        self.config.volume.restore_factor = factor.clamp(0.0, 1.0);
        self.volumes_mut().for_each(|v| v.set_restore_factor(factor));
    }

    /// Sets the stretch factor of every registered volume.
    pub fn set_stretch_factor(&mut self, factor: f32) {
        if !factor.is_finite() {
            return;
        }
        self.config.volume.stretch_factor = factor.clamp(0.0, 1.0);
        self.volumes_mut().for_each(|v| v.set_stretch_factor(factor));
    }

    /// Sets the point friction of every registered volume.
    pub fn set_friction(&mut self, friction: f32) {
        if !friction.is_finite() {
            return;
        }
        self.config.volume.point_friction = Some(friction.max(0.0));
        self.volumes_mut().for_each(|v| v.set_friction(friction));
    }

    /// Sets the kinetic friction of every registered volume.
    pub fn set_kinetic_friction(&mut self, kinetic_friction: f32) {
        if !kinetic_friction.is_finite() {
            return;
        }
        self.config.volume.kinetic_friction = kinetic_friction.max(0.0);
        self.volumes_mut()
            .for_each(|v| v.set_kinetic_friction(kinetic_friction));
    }

    // ─── Queries ──────────────────────────────────────────────

    /// Nearest volume surface crossed by segment `r0 → r1`.
    pub fn pick(&self, r0: Vec3, r1: Vec3) -> Option<PickHit> {
        let mut best: Option<PickHit> = None;
        for (i, body) in self.bodies.iter().enumerate() {
            let Body::Volume(volume) = body else {
                continue;
            };
            let Some(bb) = volume.bounding_box() else {
                continue;
            };
            if !test_aabb_segment(&bb, r0, r1) {
                continue;
            }

            let mesh = volume.mesh();
            let cell = mesh.average_edge_length().unwrap_or(1.0);
            let grid = FaceGrid::build(mesh.points(), mesh.faces(), cell);
            if let Some(hit) = grid.raycast(r0, r1) {
                if best.map_or(true, |b| hit.t < b.hit.t) {
                    best = Some(PickHit {
                        body: BodyId(i as u32),
                        hit,
                    });
                }
            }
        }
        best
    }

    /// Total kinetic energy of all volumes.
    pub fn kinetic_energy(&self) -> f32 {
        self.bodies
            .iter()
            .filter_map(Body::as_volume)
            .map(SoftVolume::kinetic_energy)
            .sum::<partix_math::CompensatedSum>()
            .value()
    }

    fn volumes_mut(&mut self) -> impl Iterator<Item = &mut SoftVolume> {
        self.bodies.iter_mut().filter_map(Body::as_volume_mut)
    }

    fn emit(&self, timestep: u32, kind: EventKind) {
        if let Some(bus) = &self.bus {
            bus.emit(SimulationEvent::new(timestep, kind));
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self {
            config: WorldConfig::default(),
            bodies: Vec::new(),
            timestep: 0,
            sim_time: 0.0,
            bus: None,
        }
    }
}
