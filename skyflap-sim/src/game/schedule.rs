//! Tick Scheduling
//!
//! Delayed and repeating callbacks measured in simulation ticks.

use serde::{Serialize, Deserialize};

/// A timer that fires every `delay_ticks` ticks, once or forever.
///
/// The first firing happens `delay_ticks` ticks after creation, not at
/// creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicTimer {
    /// Ticks between firings (at least 1)
    delay_ticks: u32,
    /// Fire repeatedly?
    looping: bool,
    /// Ticks since the last firing
    elapsed: u32,
    /// Number of firings so far
    fired: u32,
}

impl PeriodicTimer {
    /// Create a timer.
    pub fn new(delay_ticks: u32, looping: bool) -> Self {
        Self {
            delay_ticks: delay_ticks.max(1),
            looping,
            elapsed: 0,
            fired: 0,
        }
    }

    /// Advance by one tick. Returns true if the timer fired.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }

        self.elapsed += 1;
        if self.elapsed < self.delay_ticks {
            return false;
        }

        self.elapsed = 0;
        self.fired += 1;
        true
    }

    /// A one-shot timer that already fired.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.fired > 0
    }

    /// Ticks between firings.
    pub fn delay_ticks(&self) -> u32 {
        self.delay_ticks
    }

    /// Number of firings so far.
    pub fn fired_count(&self) -> u32 {
        self.fired
    }
}
