//! # partix-debug
//!
//! Inspection hooks and state snapshots for debugging simulation issues.
//! Snapshots serialize every volume's point state to binary for replay
//! and offline inspection.

pub mod hooks;
pub mod snapshot;

pub use hooks::{step_with_hooks, InspectionHook, SnapshotRecorder};
pub use snapshot::{VolumeSnapshot, WorldSnapshot};
