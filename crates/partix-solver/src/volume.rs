//! Deformable tetrahedral volume.
//!
//! A [`SoftVolume`] owns one set-up [`TetrahedralMesh`] and advances it
//! with explicit integration followed by a shape-matching correction:
//!
//! ```text
//! v += (g − c·v/m + f/m) · tick          forces
//! x += v · tick                           integrate
//! per tetrahedron:
//!   Apq = Σ w (p − c)(q)ᵀ
//!   R   = Apq · (√(ApqᵀApq))⁻¹           optimal rotation
//!   Â   = volume_preserving(Apq · Aqq⁻¹)  linear fit
//!   T   = s·R + (1 − s)·Â
//!   goal = T·q + c
//! x += k·(ḡoal − x),  v += k·(ḡoal − x) / tick
//! ```
//!
//! `s` is the stretch factor, `k` the restore factor and `ḡoal` the goal
//! averaged over every tetrahedron sharing the point. Plane collision is
//! applied afterwards by the caller on [`SoftVolume::points_mut`].

use glam::{Mat3, Mat4, Vec3};

use partix_math::decomposition::{optimal_rotation, outer, volume_preserving};
use partix_math::{Aabb, CompensatedSum};
use partix_mesh::{Point, TetrahedralMesh};
use partix_types::constants::SQRT_ITERATIONS;
use partix_types::{PartixError, PartixResult, PointId};

use crate::config::VolumeConfig;
use crate::freeze::{FreezeState, FreezeTracker};
use crate::rest_shape::RestShape;

/// Shape-matching soft body.
#[derive(Debug, Clone)]
pub struct SoftVolume {
    mesh: TetrahedralMesh,
    rest: RestShape,
    config: VolumeConfig,
    /// Replaces world gravity for this volume when set.
    global_force: Option<Vec3>,
    freeze: FreezeTracker,
    sqrt_iterations: u32,
    /// Per-point goal accumulator, reused every step.
    goals: Vec<Vec3>,
}

impl SoftVolume {
    /// Wraps a set-up mesh.
    ///
    /// Fails with [`PartixError::MeshNotSetUp`] if `setup()` has not
    /// succeeded on `mesh`, or with `InvalidConfig` for out-of-range
    /// parameters.
    pub fn new(mut mesh: TetrahedralMesh, config: VolumeConfig) -> PartixResult<Self> {
        if !mesh.is_set_up() {
            return Err(PartixError::MeshNotSetUp);
        }
        config.validate()?;

        if let Some(friction) = config.point_friction {
            for p in mesh.points_mut() {
                p.friction = friction;
            }
        }

        let rest = RestShape::from_mesh(&mesh);
        let goals = vec![Vec3::ZERO; mesh.points().len()];

        tracing::debug!(
            points = mesh.points().len(),
            tetrahedra = rest.len(),
            rest_volume = rest.total_rest_volume(),
            "soft volume created"
        );

        Ok(Self {
            mesh,
            rest,
            config,
            global_force: None,
            freeze: FreezeTracker::new(),
            sqrt_iterations: SQRT_ITERATIONS,
            goals,
        })
    }

    // ─── Accessors ────────────────────────────────────────────

    #[inline]
    pub fn mesh(&self) -> &TetrahedralMesh {
        &self.mesh
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        self.mesh.points()
    }

    /// Mutable point access for collision response.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [Point] {
        self.mesh.points_mut()
    }

    #[inline]
    pub fn rest_shape(&self) -> &RestShape {
        &self.rest
    }

    #[inline]
    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    #[inline]
    pub fn global_force(&self) -> Option<Vec3> {
        self.global_force
    }

    #[inline]
    pub fn freeze_state(&self) -> FreezeState {
        self.freeze.state()
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.freeze.is_frozen()
    }

    /// Seconds of low energy accumulated towards freezing.
    #[inline]
    pub fn freeze_timer(&self) -> f32 {
        self.freeze.timer()
    }

    #[inline]
    pub fn sqrt_iterations(&self) -> u32 {
        self.sqrt_iterations
    }

    /// Current-position bounding box.
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.mesh.bounding_box()
    }

    // ─── Setters ──────────────────────────────────────────────

    /// Non-finite values are ignored, as are those of the other scalar
    /// setters below.
    pub fn set_restore_factor(&mut self, factor: f32) {
        if factor.is_finite() {
            self.config.restore_factor = factor.clamp(0.0, 1.0);
        }
    }

    pub fn set_stretch_factor(&mut self, factor: f32) {
        if factor.is_finite() {
            self.config.stretch_factor = factor.clamp(0.0, 1.0);
        }
    }

    /// Sets the Coulomb friction of every point.
    pub fn set_friction(&mut self, friction: f32) {
        if !friction.is_finite() {
            return;
        }
        let friction = friction.max(0.0);
        for p in self.mesh.points_mut() {
            p.friction = friction;
        }
    }

    pub fn set_kinetic_friction(&mut self, kinetic_friction: f32) {
        if kinetic_friction.is_finite() {
            self.config.kinetic_friction = kinetic_friction.max(0.0);
        }
    }

    /// Overrides world gravity for this volume; `None` restores it.
    pub fn set_global_force(&mut self, force: Option<Vec3>) {
        self.global_force = force;
    }

    /// Disabling auto-freezing also wakes a frozen volume.
    pub fn set_auto_freezing(&mut self, enabled: bool) {
        self.config.auto_freezing = enabled;
        if !enabled {
            self.wake();
        }
    }

    pub fn set_sqrt_iterations(&mut self, iterations: u32) {
        self.sqrt_iterations = iterations;
    }

    // ─── Stepping ─────────────────────────────────────────────

    /// Forces, integration and shape matching for one tick.
    ///
    /// Frozen volumes are left untouched; returns whether the volume
    /// moved.
    pub fn advance(&mut self, gravity: Vec3, tick: f32) -> bool {
        if self.is_frozen() {
            return false;
        }
        self.apply_forces(gravity, tick);
        self.integrate(tick);
        self.shape_match(tick);
        true
    }

    /// Adds gravity (or the global force), drag and the accumulated
    /// external forces to point velocities, then clears the forces.
    pub fn apply_forces(&mut self, gravity: Vec3, tick: f32) {
        let acceleration = self.global_force.unwrap_or(gravity);
        let drag = self.config.speed_drag_coefficient;

        for p in self.mesh.points_mut() {
            if !p.is_pinned() {
                let a = acceleration + (p.force - p.velocity * drag) * p.inv_mass;
                p.velocity += a * tick;
            }
            p.force = Vec3::ZERO;
        }
    }

    /// Symplectic Euler position update.
    pub fn integrate(&mut self, tick: f32) {
        for p in self.mesh.points_mut() {
            if !p.is_pinned() {
                p.position += p.velocity * tick;
            }
        }
    }

    /// Pulls points toward the blended rest-shape goal.
    pub fn shape_match(&mut self, tick: f32) {
        let restore = self.config.restore_factor;
        if restore <= 0.0 || tick <= 0.0 {
            return;
        }
        let stretch = self.config.stretch_factor;

        self.goals.fill(Vec3::ZERO);
        let points = self.mesh.points();
        for e in &self.rest.elements {
            let c = e.current_centroid(points);
            let apq = e.covariance(points, c);

            let rotation = optimal_rotation(apq, self.sqrt_iterations);
            let transform = if stretch < 1.0 {
                let linear = volume_preserving(apq * e.aqq_inv);
                rotation * stretch + linear * (1.0 - stretch)
            } else {
                rotation
            };

            for (&i, &q) in e.indices.iter().zip(&e.offsets) {
                self.goals[i] += transform * q + c;
            }
        }

        let inv_tick = 1.0 / tick;
        let incidence = &self.rest.incidence;
        for (i, p) in self.mesh.points_mut().iter_mut().enumerate() {
            let n = incidence[i];
            if n == 0 || p.is_pinned() {
                continue;
            }
            let goal = self.goals[i] / n as f32;
            let d = (goal - p.position) * restore;
            p.position += d;
            p.velocity += d * inv_tick;
        }
    }

    /// Total kinetic energy `Σ ½·m·|v|²`.
    pub fn kinetic_energy(&self) -> f32 {
        self.mesh
            .points()
            .iter()
            .map(Point::kinetic_energy)
            .sum::<CompensatedSum>()
            .value()
    }

    /// Records per-point energy and advances the freeze timer.
    ///
    /// Returns the new state on a transition. Velocities are zeroed when
    /// the volume freezes.
    pub fn update_freeze(&mut self, tick: f32) -> Option<FreezeState> {
        let mut total = CompensatedSum::new();
        for p in self.mesh.points_mut() {
            p.energy = p.kinetic_energy();
            total.add(p.energy);
        }
        let energy = total.value();

        let transition = self.freeze.update(
            energy,
            tick,
            self.config.freeze_threshold_energy,
            self.config.freeze_duration,
            self.config.auto_freezing,
        );

        if transition == Some(FreezeState::Frozen) {
            for p in self.mesh.points_mut() {
                p.velocity = Vec3::ZERO;
                p.energy = 0.0;
            }
            tracing::debug!(energy, "soft volume frozen");
        }
        transition
    }

    /// Reactivates a frozen volume. Returns true if it was frozen.
    pub fn wake(&mut self) -> bool {
        let woke = self.freeze.wake();
        if woke {
            tracing::debug!("soft volume woken");
        }
        woke
    }

    // ─── Interaction ──────────────────────────────────────────

    /// Instant velocity change `Δv = J / m` on one point. Wakes the volume.
    pub fn apply_impulse(&mut self, point: PointId, impulse: Vec3) -> PartixResult<()> {
        let p = self.point_mut(point)?;
        p.velocity += impulse * p.inv_mass;
        self.wake();
        Ok(())
    }

    /// Accumulates a force consumed by the next step. Wakes the volume.
    pub fn add_force(&mut self, point: PointId, force: Vec3) -> PartixResult<()> {
        let p = self.point_mut(point)?;
        p.force += force;
        self.wake();
        Ok(())
    }

    /// Moves every current position by `offset`; the rest pose is kept.
    pub fn teleport(&mut self, offset: Vec3) {
        for p in self.mesh.points_mut() {
            p.position += offset;
        }
        self.wake();
    }

    /// Moves the rest pose so its weighted centroid is the origin.
    ///
    /// Current positions are unchanged, so afterwards
    /// [`deformed_matrix`](Self::deformed_matrix) maps the centred rest
    /// pose into world space. Returns the offset that was removed.
    pub fn regularize(&mut self) -> Vec3 {
        let weights = self.point_weights();
        let c0 = weighted_centroid(self.mesh.points(), &weights, |p| p.source_position);
        for p in self.mesh.points_mut() {
            p.source_position -= c0;
        }
        self.rest = RestShape::from_mesh(&self.mesh);
        c0
    }

    /// Clears velocities, forces, energies and the freeze state.
    pub fn restart(&mut self) {
        for p in self.mesh.points_mut() {
            p.velocity = Vec3::ZERO;
            p.force = Vec3::ZERO;
            p.energy = 0.0;
        }
        self.freeze.reset();
    }

    // ─── Output ───────────────────────────────────────────────

    /// Weighted centroid of the current positions.
    pub fn center_of_mass(&self) -> Vec3 {
        let weights = self.point_weights();
        weighted_centroid(self.mesh.points(), &weights, |p| p.position)
    }

    /// Best-fit rigid transform from the rest pose to the current pose.
    ///
    /// Uses one global covariance over every point referenced by a
    /// tetrahedron; the translation maps the rest centroid onto the
    /// current centroid.
    pub fn deformed_matrix(&self) -> Mat4 {
        let points = self.mesh.points();
        let weights = self.point_weights();
        let c = weighted_centroid(points, &weights, |p| p.position);
        let c0 = weighted_centroid(points, &weights, |p| p.source_position);

        let mut a = Mat3::ZERO;
        for (p, &w) in points.iter().zip(&weights) {
            if w > 0.0 {
                a += outer((p.position - c) * w, p.source_position - c0);
            }
        }

        let rotation = optimal_rotation(a, self.sqrt_iterations);
        Mat4::from_translation(c - rotation * c0) * Mat4::from_mat3(rotation)
    }

    /// Per-point weights: mass for free points, the mean free mass for
    /// pinned ones, zero for points no tetrahedron references.
    fn point_weights(&self) -> Vec<f32> {
        let points = self.mesh.points();
        let incidence = &self.rest.incidence;

        let (free_mass, free_count) = points
            .iter()
            .zip(incidence)
            .filter(|(p, &n)| n > 0 && !p.is_pinned())
            .fold((0.0f32, 0u32), |(m, k), (p, _)| (m + p.mass, k + 1));
        let pinned_weight = if free_count > 0 {
            free_mass / free_count as f32
        } else {
            1.0
        };

        points
            .iter()
            .zip(incidence)
            .map(|(p, &n)| match (n, p.is_pinned()) {
                (0, _) => 0.0,
                (_, true) => pinned_weight,
                (_, false) => p.mass,
            })
            .collect()
    }

    fn point_mut(&mut self, id: PointId) -> PartixResult<&mut Point> {
        let len = self.mesh.points().len();
        self.mesh
            .points_mut()
            .get_mut(id.index())
            .ok_or(PartixError::IndexOutOfRange {
                kind: "point",
                index: id.0,
                len,
            })
    }
}

fn weighted_centroid(points: &[Point], weights: &[f32], pick: impl Fn(&Point) -> Vec3) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut total = 0.0f32;
    for (p, &w) in points.iter().zip(weights) {
        sum += pick(p) * w;
        total += w;
    }
    if total > 0.0 {
        sum / total
    } else {
        Vec3::ZERO
    }
}
