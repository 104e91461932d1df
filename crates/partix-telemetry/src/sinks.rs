//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them (log through
//! `tracing`, collect in memory, ...).

use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::events::SimulationEvent;

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Event log shared between a [`VecSink`] and its reader.
pub type SharedEvents = Arc<Mutex<Vec<SimulationEvent>>>;

/// Collects events in memory for testing and inspection.
///
/// The sink is boxed into the bus, so readers keep a clone of
/// [`VecSink::events`] to look at what arrived.
#[derive(Debug, Default)]
pub struct VecSink {
    events: SharedEvents,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the collected events.
    pub fn events(&self) -> SharedEvents {
        Arc::clone(&self.events)
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that logs events using the `tracing` crate.
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        // Callsite levels must be constants.
        let level = self.level;
        if level == Level::ERROR {
            tracing::error!(timestep = event.timestep, event = ?event.kind, "simulation_event");
        } else if level == Level::WARN {
            tracing::warn!(timestep = event.timestep, event = ?event.kind, "simulation_event");
        } else if level == Level::INFO {
            tracing::info!(timestep = event.timestep, event = ?event.kind, "simulation_event");
        } else if level == Level::DEBUG {
            tracing::debug!(timestep = event.timestep, event = ?event.kind, "simulation_event");
        } else {
            tracing::trace!(timestep = event.timestep, event = ?event.kind, "simulation_event");
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
