//! # partix-telemetry
//!
//! Event bus for simulation telemetry. The world emits structured events
//! (step timing, contacts, energy, freeze transitions) that pluggable
//! sinks consume: a `tracing` logger, or an in-memory log for tests and
//! benchmarks.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, SharedEvents, TracingSink, VecSink};
