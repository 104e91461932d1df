//! # partix-mesh
//!
//! Point storage and tetrahedral topology for deformable volumes.
//!
//! ## Key Types
//!
//! - [`Point`] — One point mass: current and rest position, velocity,
//!   force accumulator, mass, friction.
//! - [`Cloud`] — The ordered point sequence. Indices are stable and are
//!   what faces, tetrahedra and edges refer to.
//! - [`TetrahedralMesh`] — Cloud plus boundary faces, tetrahedra, and
//!   the derived edge set.
//! - Procedural generators for test and benchmark bodies.

pub mod cloud;
pub mod generators;
pub mod point;
pub mod tetrahedral;

pub use cloud::Cloud;
pub use point::Point;
pub use tetrahedral::{Edge, Face, TetrahedralMesh, Tetrahedron};
