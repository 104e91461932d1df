//! # partix-math
//!
//! Linear algebra primitives for the partix simulation engine.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Mat3`, etc.)
//! - Guarded 3×3 inverse and the Denman–Beavers matrix square root
//! - Optimal-rotation extraction used by shape matching
//! - Geometric predicates (barycentric coordinates, closest point on
//!   triangle, segment/AABB/plane/triangle tests)
//! - A voxel DDA traverser for grid broad phases
//! - Compensated (Kahan) summation

pub mod decomposition;
pub mod geometry;
pub mod summation;
pub mod voxel;

// Re-export glam types as the canonical math types for partix.
pub use glam::{IVec3, Mat3, Mat4, Quat, Vec3, Vec4};

pub use geometry::Aabb;
pub use summation::CompensatedSum;
pub use voxel::VoxelTraverser;
