use chrono::{DateTime, Duration, Utc};

pub const MILLIS_IN_SECOND: u64 = 1_000;
const SECONDS_IN_MINUTE: u64 = 60;

/// Wall-clock source for `GameResult::started_at` and `finished_at`.
///
/// Countdown ticks run on tokio time, not on this clock; tests pin it with
/// [`fixed_clock`] so result timestamps are predictable.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Formats remaining countdown time as `MM:SS`.
///
/// Partial seconds are dropped, so `1999` ms shows as `00:01`.
#[must_use]
pub fn format_countdown(remaining_ms: u64) -> String {
    let seconds = remaining_ms / MILLIS_IN_SECOND;
    let minutes = seconds / SECONDS_IN_MINUTE;
    let left_seconds = seconds - minutes * SECONDS_IN_MINUTE;
    format!("{minutes:02}:{left_seconds:02}")
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
