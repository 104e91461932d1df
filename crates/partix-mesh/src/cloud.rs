//! Flat point-mass store shared by all deformable bodies.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use partix_types::{PartixError, PartixResult, PointId};

use crate::point::Point;

/// Ordered sequence of points. Points are only ever appended; their
/// indices are the identifiers used by faces, tetrahedra and edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cloud {
    points: Vec<Point>,
}

impl Cloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Appends a point at rest. `mass == 0.0` pins it.
    pub fn add_point(&mut self, position: Vec3, mass: f32) -> PointId {
        let id = PointId(self.points.len() as u32);
        self.points.push(Point::new(position, mass));
        id
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Mutable access for in-place integration. The slice cannot grow.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    #[inline]
    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.get(id.index())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total mass of all non-pinned points.
    pub fn total_mass(&self) -> f32 {
        self.points
            .iter()
            .filter(|p| !p.is_pinned())
            .map(|p| p.mass)
            .sum()
    }

    /// Rejects negative or non-finite masses.
    pub fn validate_masses(&self) -> PartixResult<()> {
        for (i, p) in self.points.iter().enumerate() {
            if !p.mass.is_finite() || p.mass < 0.0 {
                return Err(PartixError::InvalidMass {
                    index: i as u32,
                    mass: p.mass,
                });
            }
        }
        Ok(())
    }
}
