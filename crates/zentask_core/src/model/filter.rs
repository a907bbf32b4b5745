//! List projections and summary counters.

use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Which subset of tasks a list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    /// Not completed.
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl Display for UnknownFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for UnknownFilter {}

impl FromStr for TaskFilter {
    type Err = UnknownFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters shown in the summary header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Whole percentage, 0 when there are no tasks.
    pub completion_rate: u8,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total,
            completed,
            active: total - completed,
            completion_rate: completion_rate(completed, total),
        }
    }
}

/// `round(100 * completed / total)` with halves rounded up; 0 for `total == 0`.
pub fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    let rate = (200 * completed + total) / (2 * total);
    u8::try_from(rate).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_rate_rounds_half_up() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 2), 50);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(4, 4), 100);
    }

    #[test]
    fn filter_parses_known_names() {
        assert_eq!("ALL".parse::<TaskFilter>().unwrap(), TaskFilter::All);
        assert_eq!(" active".parse::<TaskFilter>().unwrap(), TaskFilter::Active);
        assert_eq!(
            "completed".parse::<TaskFilter>().unwrap(),
            TaskFilter::Completed
        );
        assert!("later".parse::<TaskFilter>().is_err());
    }

    #[test]
    fn stats_count_active_and_completed() {
        let mut done = Task::new("done", 0).unwrap();
        done.completed = true;
        let open = Task::new("open", 0).unwrap();

        let stats = TaskStats::from_tasks(&[done, open]);
        assert_eq!(
            stats,
            TaskStats {
                total: 2,
                completed: 1,
                active: 1,
                completion_rate: 50,
            }
        );
    }
}
