//! Virtual time for replay
//!
//! The replay clock runs in the log's time units (milliseconds for the
//! standard skirmish log) and is advanced by the host with elapsed real
//! seconds, scaled by a fixed factor.

use serde::{Deserialize, Serialize};

/// Default scale: one real second advances the clock by 1000 log units
pub const DEFAULT_TIME_SCALE: f64 = 1000.0;

/// Simulation clock state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VirtualClock {
    /// Current virtual time
    time: f64,
    /// Virtual units per elapsed real second
    scale: f64,
}

impl VirtualClock {
    /// Create a clock at zero with the default scale
    pub fn new() -> Self {
        Self::with_scale(DEFAULT_TIME_SCALE)
    }

    /// Create a clock at zero with a specific scale
    pub fn with_scale(scale: f64) -> Self {
        Self { time: 0.0, scale }
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.time
    }

    /// The scale factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Advance by elapsed real seconds. Negative or non-finite input is ignored
    /// so the clock never runs backwards.
    pub fn advance(&mut self, elapsed_seconds: f64) {
        if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
            self.time += elapsed_seconds * self.scale;
        }
    }

    /// Reset to zero, keeping the scale
    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}
