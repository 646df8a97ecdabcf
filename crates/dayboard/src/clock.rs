//! Day partitioning.
//!
//! Every leaderboard partition is keyed by the start of the UTC calendar day
//! it belongs to, in epoch milliseconds. [`Clock`] is the only time source
//! the leaderboard consults, so tests can swap in a [`ManualClock`].

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Start of the UTC calendar day containing `instant`, in epoch milliseconds.
pub fn day_boundary(instant: DateTime<Utc>) -> i64 {
    day_boundary_millis(instant.timestamp_millis())
}

/// Start of the UTC calendar day containing `epoch_millis`.
pub fn day_boundary_millis(epoch_millis: i64) -> i64 {
    epoch_millis.div_euclid(MILLIS_PER_DAY) * MILLIS_PER_DAY
}

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    /// Current time in epoch milliseconds.
    fn now_millis(&self) -> i64;

    /// Day boundary of the current instant.
    fn current_day_boundary(&self) -> i64 {
        day_boundary_millis(self.now_millis())
    }
}

/// Wall clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Settable clock for tests.
#[derive(Debug)]
pub struct ManualClock {
    now_millis: AtomicI64,
}

impl ManualClock {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now_millis: AtomicI64::new(now_millis),
        }
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::new(instant.timestamp_millis())
    }

    pub fn set(&self, now_millis: i64) {
        self.now_millis.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now_millis.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(days * MILLIS_PER_DAY);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now_millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn same_day_same_boundary() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 1).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(day_boundary(morning), day_boundary(night));
        assert_eq!(day_boundary(morning), midnight.timestamp_millis());
    }

    #[test]
    fn boundary_changes_exactly_at_midnight() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        let ms = midnight.timestamp_millis();
        assert_eq!(day_boundary_millis(ms - 1), ms - MILLIS_PER_DAY);
        assert_eq!(day_boundary_millis(ms), ms);
    }

    #[test]
    fn pre_epoch_instants_round_down() {
        assert_eq!(day_boundary_millis(-1), -MILLIS_PER_DAY);
    }

    #[test]
    fn manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let clock = ManualClock::at(start);
        let today = clock.current_day_boundary();

        clock.advance(60 * 60 * 1000);
        assert_eq!(clock.current_day_boundary(), today);

        clock.advance_days(1);
        assert_eq!(clock.current_day_boundary(), today + MILLIS_PER_DAY);

        clock.set(start.timestamp_millis());
        assert_eq!(clock.current_day_boundary(), today);
    }

    #[test]
    fn system_clock_is_on_a_boundary_multiple() {
        let boundary = SystemClock.current_day_boundary();
        assert_eq!(boundary % MILLIS_PER_DAY, 0);
        assert!(SystemClock.now_millis() >= boundary);
    }
}
