//! Closed box of planes.

use glam::Vec3;

use partix_contact::BoundingPlane;
use partix_types::{PartixError, PartixResult};

/// Six walls at `±half_extent` on each axis, normals facing the origin.
///
/// Order: the +x, −x, +y, −y, +z and −z walls.
pub fn room(half_extent: f32) -> PartixResult<[BoundingPlane; 6]> {
    if !(half_extent.is_finite() && half_extent > 0.0) {
        return Err(PartixError::InvalidConfig(format!(
            "room half extent must be positive, got {half_extent}"
        )));
    }
    let wall = |axis: Vec3| BoundingPlane::new(axis * half_extent, -axis);
    Ok([
        wall(Vec3::X)?,
        wall(Vec3::NEG_X)?,
        wall(Vec3::Y)?,
        wall(Vec3::NEG_Y)?,
        wall(Vec3::Z)?,
        wall(Vec3::NEG_Z)?,
    ])
}
