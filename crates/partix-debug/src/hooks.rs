//! Inspection hooks for live debugging.
//!
//! Hooks are called around each world step to capture state without
//! touching the pipeline itself.

use partix_types::PartixResult;
use partix_world::{StepReport, World};

use crate::snapshot::WorldSnapshot;

/// Trait for simulation inspection hooks.
///
/// # Lifecycle
///
/// ```text
/// for each step:
///   hook.on_step_begin(world)
///   world.update(dt)
///   hook.on_step_end(world, report)
/// hook.on_simulation_end()
/// ```
pub trait InspectionHook {
    /// Called before the world is stepped.
    fn on_step_begin(&mut self, world: &World) {
        let _ = world;
    }

    /// Called after the world is stepped.
    fn on_step_end(&mut self, world: &World, report: &StepReport) {
        let _ = (world, report);
    }

    /// Called when the simulation completes.
    fn on_simulation_end(&mut self) {}

    /// Returns the hook's name for logging.
    fn name(&self) -> &str;
}

/// Steps `world` by `dt`, calling every hook around the update.
pub fn step_with_hooks(
    world: &mut World,
    dt: f32,
    hooks: &mut [&mut dyn InspectionHook],
) -> PartixResult<StepReport> {
    for hook in hooks.iter_mut() {
        hook.on_step_begin(world);
    }
    let report = world.update(dt)?;
    for hook in hooks.iter_mut() {
        hook.on_step_end(world, &report);
    }
    Ok(report)
}

/// Captures a [`WorldSnapshot`] every `interval` steps.
#[derive(Debug, Clone)]
pub struct SnapshotRecorder {
    interval: u32,
    snapshots: Vec<WorldSnapshot>,
}

impl SnapshotRecorder {
    /// An interval of zero is treated as one.
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            snapshots: Vec::new(),
        }
    }

    pub fn snapshots(&self) -> &[WorldSnapshot] {
        &self.snapshots
    }

    pub fn latest(&self) -> Option<&WorldSnapshot> {
        self.snapshots.last()
    }

    /// Drains recorded snapshots.
    pub fn take(&mut self) -> Vec<WorldSnapshot> {
        std::mem::take(&mut self.snapshots)
    }
}

impl InspectionHook for SnapshotRecorder {
    fn on_step_end(&mut self, world: &World, _report: &StepReport) {
        if world.timestep() % self.interval == 0 {
            self.snapshots.push(WorldSnapshot::capture(world));
        }
    }

    fn on_simulation_end(&mut self) {
        tracing::debug!(count = self.snapshots.len(), "snapshot recording finished");
    }

    fn name(&self) -> &str {
        "snapshot_recorder"
    }
}
