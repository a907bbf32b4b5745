//! Due-minute alarm scanner.
//!
//! # Responsibility
//! - On every tick, fire reminders for tasks due exactly at the current
//!   minute and mark them notified.
//!
//! # Invariants
//! - Matching is exact equality on date and minute, never "time has passed":
//!   a task whose minute elapsed while nothing was scanning is not fired
//!   later.
//! - A task fires at most once per deadline; `notified` gates re-firing.
//! - Completed tasks never fire.
//! - A denied permission skips delivery but still marks the task notified.
//! - Ticks that fire nothing write nothing.
//! - The scan period is at most 30 seconds so every minute is seen at least
//!   twice.

use crate::clock::{current_minute, Clock};
use crate::model::task::Task;
use crate::ports::{Notifier, Permission};
use crate::repo::task_repo::TaskRepository;
use crate::service::task_store::TaskStore;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);
pub const MAX_SCAN_INTERVAL: Duration = Duration::from_secs(30);

pub const NOTIFICATION_TITLE: &str = "ZenTask reminder";

/// Result of one scan tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Tasks that transitioned to `notified`, in store order.
    pub fired: Vec<Task>,
    /// How many of those were actually delivered to the notifier.
    pub delivered: usize,
}

impl ScanReport {
    pub fn is_idle(&self) -> bool {
        self.fired.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanIntervalError {
    Zero,
    TooLong(Duration),
}

impl Display for ScanIntervalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zero => write!(f, "scan interval must be greater than zero"),
            Self::TooLong(interval) => write!(
                f,
                "scan interval {}s exceeds {}s; due minutes could be skipped",
                interval.as_secs_f64(),
                MAX_SCAN_INTERVAL.as_secs()
            ),
        }
    }
}

impl Error for ScanIntervalError {}

/// Checks that `interval` guarantees two ticks per minute.
pub fn validate_scan_interval(interval: Duration) -> Result<Duration, ScanIntervalError> {
    if interval.is_zero() {
        return Err(ScanIntervalError::Zero);
    }
    if interval > MAX_SCAN_INTERVAL {
        return Err(ScanIntervalError::TooLong(interval));
    }
    Ok(interval)
}

/// Body text for a fired task.
pub fn notification_body(task: &Task) -> String {
    format!("Due now: {}", task.text)
}

/// Scans a store against its clock and dispatches reminders.
pub struct AlarmScanner<N: Notifier> {
    notifier: N,
}

impl<N: Notifier> AlarmScanner<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Requests permission if the user has not been asked yet.
    pub fn ensure_permission(&self) -> Permission {
        let current = self.notifier.permission();
        if current != Permission::Default {
            return current;
        }
        let granted = self.notifier.request_permission();
        info!("event=notify_permission module=alarm status=ok permission={granted}");
        granted
    }

    /// Runs one tick: match, mark, persist if anything changed, deliver.
    pub fn tick<R: TaskRepository, C: Clock>(&self, store: &mut TaskStore<R, C>) -> ScanReport {
        let (date, time) = current_minute(store.now());
        let fired = store.mark_due_notified(date, time);
        if fired.is_empty() {
            debug!("event=alarm_scan module=alarm status=idle minute={date}T{time}");
            return ScanReport::default();
        }

        let permission = self.notifier.permission();
        let mut delivered = 0;
        if permission == Permission::Granted {
            for task in &fired {
                self.notifier.notify(NOTIFICATION_TITLE, &notification_body(task));
                delivered += 1;
            }
        }

        info!(
            "event=alarm_scan module=alarm status=fired minute={date}T{time} fired={} delivered={delivered} permission={permission}",
            fired.len()
        );
        ScanReport { fired, delivered }
    }
}
