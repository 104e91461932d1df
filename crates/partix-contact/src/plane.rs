//! Infinite plane collision.
//!
//! A plane keeps points on the side its normal points to. Penetrating
//! points are projected back along the normal, lose their inward normal
//! velocity (no restitution), and have their tangential velocity reduced
//! by Coulomb friction plus a kinetic damping term.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use partix_mesh::Point;
use partix_types::constants::EPSILON;
use partix_types::{PartixError, PartixResult};

use crate::response::{Collider, ContactResult};

/// Static plane with infinite extent and mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingPlane {
    position: Vec3,
    /// Unit normal, pointing into the allowed half-space.
    normal: Vec3,
}

impl BoundingPlane {
    /// Creates a plane through `position`. `normal` is normalised; a zero
    /// or non-finite normal is rejected.
    pub fn new(position: Vec3, normal: Vec3) -> PartixResult<Self> {
        let n = normal.normalize_or_zero();
        if n == Vec3::ZERO || !position.is_finite() {
            return Err(PartixError::InvalidConfig(format!(
                "plane needs a finite position and non-zero normal, got {position} / {normal}"
            )));
        }
        Ok(Self {
            position,
            normal: n,
        })
    }

    /// Horizontal floor at `y = height`, facing up.
    pub fn ground(height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, height, 0.0),
            normal: Vec3::Y,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Distance of `p` above the plane; negative when penetrating.
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.position).dot(self.normal)
    }

    /// Resolves all penetrating points in a single pass.
    pub fn resolve(&self, points: &mut [Point], kinetic_friction: f32, tick: f32) -> ContactResult {
        let n = self.normal;
        let damping = (1.0 - kinetic_friction * tick).max(0.0);
        let mut result = ContactResult::default();

        for p in points.iter_mut() {
            if p.is_pinned() {
                continue;
            }
            let depth = self.signed_distance(p.position);
            if depth >= 0.0 {
                continue;
            }

            p.position -= n * depth;

            // Inelastic: remove the inward normal speed.
            let vn = p.velocity.dot(n);
            let impulse = if vn < 0.0 {
                p.velocity -= n * vn;
                -vn
            } else {
                0.0
            };

            let vn = p.velocity.dot(n);
            let vt = p.velocity - n * vn;
            let vt_len = vt.length();
            if vt_len > EPSILON {
                let coulomb = if impulse > 0.0 {
                    (1.0 - p.friction * impulse / vt_len).max(0.0)
                } else {
                    1.0
                };
                p.velocity = n * vn + vt * (coulomb * damping);
            }

            result.resolved_count += 1;
            result.max_penetration = result.max_penetration.max(-depth);
            result.max_impulse = result.max_impulse.max(impulse);
        }

        if !result.is_empty() {
            tracing::trace!(
                resolved = result.resolved_count,
                max_penetration = result.max_penetration,
                "plane contacts resolved"
            );
        }
        result
    }
}

impl Collider for BoundingPlane {
    fn resolve(&self, points: &mut [Point], kinetic_friction: f32, tick: f32) -> ContactResult {
        BoundingPlane::resolve(self, points, kinetic_friction, tick)
    }

    fn name(&self) -> &str {
        "bounding_plane"
    }
}
