//! # partix-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the partix soft-body simulation engine.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other partix crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{PartixError, PartixResult};
pub use ids::{BodyId, FaceId, PointId, TetrahedronId};
