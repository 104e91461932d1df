//! Freeze state machine.
//!
//! A volume whose kinetic energy stays below a threshold for a sustained
//! duration stops integrating until something wakes it.
//!
//! ```text
//!          energy < threshold for `duration`
//!   Active ─────────────────────────────────▶ Frozen
//!     ▲                                         │
//!     └───────── force / impulse / wake ────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Whether a volume is integrated this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FreezeState {
    #[default]
    Active,
    Frozen,
}

/// Freeze state plus the low-energy timer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FreezeTracker {
    state: FreezeState,
    /// Seconds of continuous low energy while Active.
    timer: f32,
}

impl FreezeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> FreezeState {
        self.state
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.state == FreezeState::Frozen
    }

    #[inline]
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Advances the timer by one step with the volume's current energy.
    ///
    /// Returns the new state if a transition happened. With
    /// `auto_freezing` off the timer is held at zero.
    pub fn update(
        &mut self,
        energy: f32,
        tick: f32,
        threshold: f32,
        duration: f32,
        auto_freezing: bool,
    ) -> Option<FreezeState> {
        if self.state == FreezeState::Frozen {
            return None;
        }
        if !auto_freezing || energy >= threshold {
            self.timer = 0.0;
            return None;
        }

        self.timer += tick;
        if self.timer >= duration {
            self.state = FreezeState::Frozen;
            self.timer = 0.0;
            Some(FreezeState::Frozen)
        } else {
            None
        }
    }

    /// Forces the Active state. Returns true if the tracker was frozen.
    pub fn wake(&mut self) -> bool {
        let was_frozen = self.is_frozen();
        self.state = FreezeState::Active;
        self.timer = 0.0;
        was_frozen
    }

    /// Back to Active with a cleared timer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
