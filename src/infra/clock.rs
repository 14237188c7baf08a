//! Clock abstraction
//!
//! The clone retry loop measures elapsed time and sleeps between attempts
//! through this trait, so tests can simulate a time budget without real
//! delays.

use std::time::{Duration, Instant};

/// Time source and sleep provider for bounded retry loops
pub trait Clock {
    /// Current instant
    fn now(&self) -> Instant;

    /// Block for the given duration
    fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
