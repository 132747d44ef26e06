//! Clock abstraction for playback timing.
//!
//! The transport computes its position from an absolute, monotonically
//! increasing counter rather than a software timer. Injecting the clock
//! keeps the transport testable with simulated time.

use std::time::Instant;

/// A monotonically increasing clock, in seconds.
///
/// The absolute origin is arbitrary; only differences are meaningful.
pub trait AudioClock {
    /// Returns the current time in seconds on this clock's timeline.
    fn now(&self) -> f64;
}

/// The real clock, anchored at process startup.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioClock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
