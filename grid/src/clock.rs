//! Wall-clock access for synthetic row ids and date defaults.

use time::{Date, OffsetDateTime};

/// Source of "now" for the engine.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;

    /// Today's calendar date.
    fn today(&self) -> Date;
}

/// Clock backed by the system time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }

    fn today(&self) -> Date {
        OffsetDateTime::now_utc().date()
    }
}

/// Clock frozen at a fixed instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now_ms: i64,
    pub today: Date,
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.now_ms
    }

    fn today(&self) -> Date {
        self.today
    }
}
