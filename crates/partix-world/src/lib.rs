//! # partix-world
//!
//! The simulation session: an arena of bodies and the per-step pipeline
//! that drives them.
//!
//! ## Key Types
//!
//! - [`Body`] — Closed set of body kinds: static plane or soft volume
//! - [`World`] — Owns the bodies, hands out [`BodyId`](partix_types::BodyId)
//!   handles, runs `update(dt)`
//! - [`WorldConfig`] — Tick, gravity, square-root iterations, volume defaults
//! - [`StepReport`] — What happened during one step
//! - [`room`] — Six inward-facing walls around the origin

pub mod body;
pub mod config;
pub mod room;
pub mod world;

pub use body::Body;
pub use config::WorldConfig;
pub use room::room;
pub use world::{PickHit, StepReport, World};
