//! # partix-solver
//!
//! Time integration, shape matching, and freeze bookkeeping for soft
//! tetrahedral volumes.
//!
//! ## Key Types
//!
//! - [`SoftVolume`] — A set-up tetrahedral mesh plus its dynamic state
//! - [`VolumeConfig`] — Restore/stretch factors, drag, friction, freezing
//! - [`rest_shape::RestShape`] — Per-tetrahedron rest offsets and `Aqq⁻¹`
//! - [`FreezeState`] — Active / Frozen state machine

pub mod config;
pub mod freeze;
pub mod rest_shape;
pub mod volume;

pub use config::VolumeConfig;
pub use freeze::{FreezeState, FreezeTracker};
pub use rest_shape::{RestShape, RestTetrahedron};
pub use volume::SoftVolume;
