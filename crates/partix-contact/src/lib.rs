//! # partix-contact
//!
//! Collision response against static geometry and ray queries against
//! deformable surfaces.
//!
//! - [`BoundingPlane`] — infinite plane; projects penetrating points back
//!   and applies Coulomb plus kinetic friction
//! - [`Collider`] — trait implemented by static colliders, driven in
//!   sequence by [`resolve_all`]
//! - [`FaceGrid`] — uniform grid of boundary faces walked by
//!   voxel traversal for nearest-hit segment queries

pub mod face_grid;
pub mod plane;
pub mod response;

pub use face_grid::{FaceGrid, RayHit};
pub use plane::BoundingPlane;
pub use response::{resolve_all, Collider, ContactResult};
