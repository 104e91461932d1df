//! Error types for the partix engine.
//!
//! All crates return `PartixResult<T>` from fallible operations.

use thiserror::Error;

use crate::ids::BodyId;

/// Unified error type for the partix engine.
#[derive(Debug, Error)]
pub enum PartixError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A face, tetrahedron, or edge references a point that does not exist.
    #[error("{kind} references point {index}, but the cloud holds {len} points")]
    IndexOutOfRange {
        kind: &'static str,
        index: u32,
        len: usize,
    },

    /// The mesh has no tetrahedra, so no edges can be derived.
    #[error("Mesh has no tetrahedra")]
    EmptyMesh,

    /// A body was built from a mesh whose `setup()` has not run.
    #[error("Mesh has not been set up")]
    MeshNotSetUp,

    /// A point mass is negative or not finite.
    #[error("Point {index} has invalid mass {mass}")]
    InvalidMass { index: u32, mass: f32 },

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No body is registered under this handle.
    #[error("Unknown body {0:?}")]
    UnknownBody(BodyId),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, PartixError>`.
pub type PartixResult<T> = Result<T, PartixError>;
