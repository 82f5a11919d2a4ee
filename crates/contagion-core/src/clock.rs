//! Step clock for a simulation run.
//!
//! The clock is the single source of truth for simulation time. It starts
//! at 0 and advances by one per completed step, using checked arithmetic
//! (no silent overflow). How many steps a run takes is the runner's
//! business, not the clock's.

use crate::error::EngineError;

/// Discrete simulation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct StepClock {
    /// Current time (0-indexed, incremented after each step).
    step: u64,
}

impl StepClock {
    /// Create a clock at time 0.
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    /// Create a clock at an explicit time (useful for testing).
    pub const fn at(step: u64) -> Self {
        Self { step }
    }

    /// Advance by one step. Returns the new time.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StepOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, EngineError> {
        self.step = self.step.checked_add(1).ok_or(EngineError::StepOverflow)?;
        Ok(self.step)
    }

    /// Current time.
    pub const fn step(&self) -> u64 {
        self.step
    }
}
