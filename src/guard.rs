//! Single-flight guard for operations that must not overlap.

use std::sync::atomic::{AtomicBool, Ordering};

/// Allows one operation at a time. A second caller is turned away rather than
/// queued.
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    /// Create an idle guard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the guard, or `None` if an operation is already running.
    #[must_use]
    pub fn try_begin(&self) -> Option<FlightPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightPermit { guard: self })
    }

    /// Whether an operation holds the guard.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of an operation. Dropping it releases the guard
/// whatever the outcome.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    guard: &'a SingleFlight,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}
