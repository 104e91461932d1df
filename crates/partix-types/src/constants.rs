//! Physical constants and simulation defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.8;

/// Default simulation tick (seconds).
pub const DEFAULT_TICK: f32 = 0.02;

/// Default velocity-proportional drag coefficient.
pub const SPEED_DRAG_COEFFICIENT: f32 = 0.0001;

/// Default kinetic friction applied to points sliding along a plane.
pub const KINETIC_FRICTION: f32 = 0.0;

/// Kinetic energy below which a body starts counting towards freezing.
pub const FREEZE_THRESHOLD_ENERGY: f32 = 2.0;

/// Seconds of sustained low energy before a body freezes.
pub const FREEZE_DURATION: f32 = 0.5;

/// Default shape-matching stiffness.
pub const DEFAULT_RESTORE_FACTOR: f32 = 0.3;

/// Default rigidity share of the shape-matching goal.
pub const DEFAULT_STRETCH_FACTOR: f32 = 0.7;

/// Fixed Denman–Beavers iteration count for matrix square roots.
///
/// The iteration never checks convergence; results for ill-conditioned
/// inputs are a truncated approximation.
pub const SQRT_ITERATIONS: u32 = 10;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-6;

/// Tetrahedra with a rest volume below this are reported as degenerate.
pub const DEGENERATE_VOLUME_THRESHOLD: f32 = 1.0e-9;

/// Normal speed change (m/s) above which a plane contact wakes a frozen body.
pub const WAKE_IMPULSE_THRESHOLD: f32 = 1.0e-3;
