//! Time source abstraction so IDs and default dates are testable.

use time::{Date, OffsetDateTime};

/// Provides the current time for ID generation and default dates.
pub trait Clock {
    /// The current date and time.
    fn now(&self) -> OffsetDateTime;

    /// The current calendar date.
    fn today(&self) -> Date {
        self.now().date()
    }

    /// Milliseconds since the Unix epoch, the raw material for transaction
    /// IDs.
    fn timestamp_millis(&self) -> i64 {
        (self.now().unix_timestamp_nanos() / 1_000_000) as i64
    }
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock frozen at a fixed instant, for deterministic tests.
#[cfg(test)]
pub(crate) struct FixedClock(pub(crate) OffsetDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
