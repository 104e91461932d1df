//! Collider trait and contact statistics.
//!
//! Static colliders resolve penetrations directly on point positions and
//! velocities; there is no separate detection phase.

use serde::{Deserialize, Serialize};

use partix_mesh::Point;

/// Result of one collision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactResult {
    /// Number of points pushed back out.
    pub resolved_count: u32,
    /// Deepest penetration found before correction.
    pub max_penetration: f32,
    /// Largest normal speed removed from a point.
    pub max_impulse: f32,
}

impl ContactResult {
    /// Combines the statistics of two passes.
    pub fn merge(&mut self, other: &ContactResult) {
        self.resolved_count += other.resolved_count;
        self.max_penetration = self.max_penetration.max(other.max_penetration);
        self.max_impulse = self.max_impulse.max(other.max_impulse);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resolved_count == 0
    }
}

/// Immovable collision geometry.
///
/// # Implementations
/// - [`BoundingPlane`](crate::plane::BoundingPlane) — infinite half-space
pub trait Collider: Send + Sync {
    /// Pushes penetrating points out and applies contact friction.
    ///
    /// Pinned points are skipped. One pass only: contacts against
    /// several colliders are not solved simultaneously.
    fn resolve(&self, points: &mut [Point], kinetic_friction: f32, tick: f32) -> ContactResult;

    /// Returns the collider name.
    fn name(&self) -> &str;
}

/// Resolves `points` against each collider in turn and merges the
/// statistics. Later colliders see the corrections of earlier ones.
pub fn resolve_all(
    colliders: &[&dyn Collider],
    points: &mut [Point],
    kinetic_friction: f32,
    tick: f32,
) -> ContactResult {
    let mut result = ContactResult::default();
    for collider in colliders {
        result.merge(&collider.resolve(points, kinetic_friction, tick));
    }
    result
}
