//! Time sources for the animator
//!
//! Timestamps are plain `f64` seconds. Only differences between them matter,
//! so each clock picks its own origin.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Something that can tell the animator what time it is
pub trait Clock {
    /// Current time in seconds
    fn now(&self) -> f64;
}

/// Monotonic wall clock, measured from construction
#[derive(Clone, Copy, Debug)]
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

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one copy and hand another
/// to the animator.
///
/// ```
/// use chartkit_animation::{Clock, ManualClock};
///
/// let clock = ManualClock::new(0.0);
/// let shared = clock.clone();
/// clock.advance(0.25);
/// assert_eq!(shared.now(), 0.25);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, time: f64) {
        self.now.set(time);
    }

    /// Move forward by `delta` seconds
    pub fn advance(&self, delta: f64) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}
