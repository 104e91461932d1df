//! # partix-bench
//!
//! Benchmark suite for the partix soft-body engine.
//!
//! Provides 3 procedural scenarios, metric collection, and CSV/JSON
//! export for regression tracking.

pub mod metrics;
pub mod runner;
pub mod scenarios;

pub use metrics::ScenarioMetrics;
pub use runner::ScenarioRunner;
pub use scenarios::{Scenario, ScenarioKind};
