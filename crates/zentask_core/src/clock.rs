//! Time source abstraction.
//!
//! # Responsibility
//! - Supply the current local date/time to the store and alarm scanner.
//! - Let tests pin and advance time deterministically.
//!
//! # Invariants
//! - All due-date comparisons use local wall-clock time.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::cell::Cell;
use std::rc::Rc;

use crate::model::task::truncate_to_minute;

/// Source of "now".
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Current Unix epoch milliseconds, used for `created_at`.
    fn now_epoch_ms(&self) -> i64 {
        self.now().and_utc().timestamp_millis()
    }
}

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually controlled clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// Splits `now` into the date and minute the alarm scanner matches against.
pub fn current_minute(now: NaiveDateTime) -> (NaiveDate, NaiveTime) {
    (now.date(), truncate_to_minute(now.time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_clones_share_time() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 59, 0)
            .unwrap();
        let clock = FixedClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));
    }

    #[test]
    fn current_minute_drops_seconds() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(9, 0, 42, 500)
            .unwrap();
        let (date, time) = current_minute(now);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }
}
