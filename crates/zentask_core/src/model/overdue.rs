//! Display-only overdue evaluation.
//!
//! The result is advisory: it never mutates a task and is independent of the
//! alarm scanner's `notified` flag.

use crate::model::task::Task;
use chrono::NaiveDateTime;

/// Returns the instant after which an incomplete task counts as overdue.
///
/// Without a due time the deadline is the last second of the due date.
pub fn deadline(task: &Task) -> Option<NaiveDateTime> {
    let date = task.due_date?;
    match task.due_time {
        Some(time) => Some(date.and_time(time)),
        None => date.and_hms_opt(23, 59, 59),
    }
}

/// Whether `task` is incomplete and its deadline lies strictly before `now`.
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    if task.completed {
        return false;
    }
    deadline(task).is_some_and(|deadline| deadline < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn task_due(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Task {
        Task::new("report", 0).unwrap().with_due(date, time)
    }

    #[test]
    fn date_only_deadline_is_end_of_day() {
        let task = task_due(NaiveDate::from_ymd_opt(2024, 1, 1), None);
        assert!(!is_overdue(&task, at(2024, 1, 1, 23, 59, 58)));
        assert!(!is_overdue(&task, at(2024, 1, 1, 23, 59, 59)));
        assert!(is_overdue(&task, at(2024, 1, 2, 0, 0, 1)));
    }

    #[test]
    fn due_time_is_compared_strictly() {
        let task = task_due(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveTime::from_hms_opt(9, 0, 0),
        );
        assert!(!is_overdue(&task, at(2024, 1, 1, 9, 0, 0)));
        assert!(is_overdue(&task, at(2024, 1, 1, 9, 0, 1)));
    }

    #[test]
    fn completed_or_undated_tasks_are_never_overdue() {
        let mut task = task_due(NaiveDate::from_ymd_opt(2020, 1, 1), None);
        task.completed = true;
        assert!(!is_overdue(&task, at(2024, 1, 1, 0, 0, 0)));

        let undated = task_due(None, NaiveTime::from_hms_opt(1, 0, 0));
        assert!(!is_overdue(&undated, at(2099, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn evaluation_does_not_touch_notified() {
        let task = task_due(NaiveDate::from_ymd_opt(2020, 1, 1), None);
        let before = task.clone();
        let _ = is_overdue(&task, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(task, before);
    }
}
