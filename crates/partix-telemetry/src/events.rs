//! Simulation event types.
//!
//! Structured events emitted by the world during each step. Events are
//! lightweight value types that carry just enough data to be useful for
//! monitoring and debugging.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the engine.
///
/// Events are tagged with a timestep index and carry domain-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Timestep number (0-indexed).
    pub timestep: u32,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants. `body` is the arena index of the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Step started.
    StepBegin {
        /// Simulation time at the start of the step (seconds).
        sim_time: f64,
        /// Step length (seconds).
        dt: f32,
    },

    /// Step completed.
    StepEnd {
        /// Wall-clock time for the entire step (seconds).
        wall_time: f64,
        /// Volumes integrated this step.
        active_volumes: u32,
        /// Volumes skipped because they were frozen.
        frozen_volumes: u32,
    },

    /// Plane contacts resolved for one volume.
    Contacts {
        body: u32,
        resolved_count: u32,
        /// Deepest penetration before correction (meters).
        max_penetration: f32,
        /// Largest normal speed removed (m/s).
        max_impulse: f32,
    },

    /// Kinetic energy of one volume after the step.
    Energy { body: u32, kinetic: f64 },

    /// A volume froze or woke.
    FreezeChanged { body: u32, frozen: bool },
}

impl SimulationEvent {
    /// Creates a new event for the given timestep.
    pub fn new(timestep: u32, kind: EventKind) -> Self {
        Self { timestep, kind }
    }
}
