//! Monotonic nanosecond clock
//!
//! The engine never reads wall time directly; everything that needs a
//! timestamp goes through the `Clock` trait so tests can drive time
//! deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Nanoseconds from an unspecified monotonic epoch.
pub type Timestamp = u64;

/// Source of monotonic nanosecond timestamps.
pub trait Clock: Send {
    fn now(&self) -> Timestamp;
}

/// Production clock: nanoseconds elapsed since the clock was created.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_nanos() as Timestamp
    }
}

/// Hand-driven clock for tests.
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn advance(&self, nanos: u64) {
        self.now.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::Relaxed)
    }
}
