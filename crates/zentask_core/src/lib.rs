//! Task lifecycle and alarm engine for ZenTask.
//! This crate is the single source of truth for task invariants.

pub mod alarm;
pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod motivation;
pub mod ports;
pub mod repo;
pub mod service;

pub use alarm::{validate_scan_interval, AlarmScanner, ScanReport, DEFAULT_SCAN_INTERVAL};
pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::filter::{completion_rate, TaskFilter, TaskStats};
pub use model::overdue::is_overdue;
pub use model::task::{Priority, Task, TaskId, TaskValidationError};
pub use motivation::{fetch_motivation_or_fallback, Motivation, MotivationError, MotivationSource};
pub use ports::{Celebration, Notifier, Permission};
pub use repo::task_repo::{
    MemoryTaskRepository, RepoError, RepoResult, SqliteTaskRepository, TaskRepository,
};
pub use service::task_store::TaskStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
