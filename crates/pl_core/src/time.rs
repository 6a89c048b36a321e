//! Time source seam.
//!
//! The capture flow polls the video playback position exactly once, at the
//! moment of submission. Anything that can answer "where is the video right
//! now, in seconds" can drive the logger.

use std::sync::{Arc, RwLock};

/// Supplies the current video playback position on demand.
pub trait TimeSource {
    /// Current playback position in seconds. Implementations report `0.0`
    /// when no position is available.
    fn current_time_sec(&self) -> f64;
}

/// Time source for sessions without a player attached. Always reports `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTimeSource;

impl TimeSource for NullTimeSource {
    fn current_time_sec(&self) -> f64 {
        0.0
    }
}

/// Operator-scrubbed clock standing in for a synchronized video player.
///
/// Cloning yields a handle to the same underlying position, so one clone can
/// live inside the session while the UI scrubs through another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Arc<RwLock<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock. Negative positions clamp to zero.
    pub fn set(&self, seconds: f64) {
        *self.seconds.write().expect("clock lock poisoned") = seconds.max(0.0);
    }
}

impl TimeSource for ManualClock {
    fn current_time_sec(&self) -> f64 {
        *self.seconds.read().expect("clock lock poisoned")
    }
}
