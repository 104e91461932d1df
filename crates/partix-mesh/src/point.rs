//! A single simulated point mass.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Point mass owned by exactly one [`Cloud`](crate::Cloud).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Current world-space position.
    pub position: Vec3,
    /// Rest-pose position, the reference for shape matching.
    pub source_position: Vec3,
    pub velocity: Vec3,
    /// External force accumulated since the last step.
    pub force: Vec3,
    pub mass: f32,
    /// `0.0` for pinned (infinite-mass) points.
    pub inv_mass: f32,
    /// Coulomb friction coefficient against planes.
    pub friction: f32,
    /// Kinetic energy at the end of the last step.
    pub energy: f32,
}

impl Point {
    /// Creates a point at rest.
    ///
    /// A mass of exactly zero pins the point: its inverse mass is zero
    /// and integration never moves it.
    pub fn new(position: Vec3, mass: f32) -> Self {
        let inv_mass = if mass == 0.0 { 0.0 } else { 1.0 / mass };
        Self {
            position,
            source_position: position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass,
            inv_mass,
            friction: 0.0,
            energy: 0.0,
        }
    }

    /// Returns true for pinned points.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// `0.5 · m · |v|²`, zero for pinned points.
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        if self.is_pinned() {
            0.0
        } else {
            0.5 * self.mass * self.velocity.length_squared()
        }
    }
}
