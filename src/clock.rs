//! Clock
//!
//! The console reads wall-clock time in the marketplace's zone and simulates
//! network latency before committing writes. Both go through [`Clock`] so
//! tests can drive time by hand.

use std::{
    fmt::Debug,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp, civil::DateTime, tz::TimeZone};

/// Zone the marketplace runs its schedules in.
pub const MARKETPLACE_TIME_ZONE: &str = "Asia/Kolkata";

/// Source of "now" and of simulated delays.
#[async_trait]
pub trait Clock: Send + Sync + Debug {
    /// Current wall-clock time.
    fn now(&self) -> DateTime;

    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Real time in a fixed zone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    zone: TimeZone,
}

impl SystemClock {
    /// Clock reading wall-clock time in `zone`.
    #[must_use]
    pub const fn new(zone: TimeZone) -> Self {
        Self { zone }
    }

    /// Clock reading wall-clock time in the IANA zone `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not in the time zone database.
    pub fn in_zone(name: &str) -> Result<Self, jiff::Error> {
        TimeZone::get(name).map(Self::new)
    }

    /// The zone "now" is read in.
    #[must_use]
    pub const fn zone(&self) -> &TimeZone {
        &self.zone
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        Timestamp::now().to_zoned(self.zone.clone()).datetime()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A clock that only moves when told to.
///
/// Sleeping advances the clock by the requested duration and yields once to
/// the runtime, so concurrent tasks interleave without real waiting.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime>,
}

impl ManualClock {
    /// Clock frozen at `now`.
    #[must_use]
    pub const fn new(now: DateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move forward by `duration`, saturating at the end of time.
    pub fn advance(&self, duration: Duration) {
        let step = SignedDuration::try_from(duration).unwrap_or(SignedDuration::MAX);
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);

        *now = now.saturating_add(step);
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);

        tokio::task::yield_now().await;
    }
}
