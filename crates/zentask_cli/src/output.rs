//! Plain-text rendering of tasks, stats and motivation.

use chrono::NaiveDateTime;
use zentask_core::model::task::format_due_time;
use zentask_core::{is_overdue, Motivation, Task, TaskId, TaskStats};

/// Number of id characters shown in listings; accepted back as a prefix.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: TaskId) -> String {
    id.simple().to_string()[..SHORT_ID_LEN].to_string()
}

pub fn format_task_line(task: &Task, now: NaiveDateTime) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{} {} {}", short_id(task.id), checkbox, task.text);

    if let Some(date) = task.due_date {
        line.push_str(&format!("  due {date}"));
        if let Some(time) = task.due_time {
            line.push_str(&format!(" {}", format_due_time(time)));
        }
    }
    if is_overdue(task, now) {
        line.push_str("  OVERDUE");
    }
    line
}

pub fn format_task_list<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: NaiveDateTime) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&format_task_line(task, now));
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str("No tasks.\n");
    }
    out
}

pub fn format_stats(stats: &TaskStats) -> String {
    format!(
        "Total:      {}\nCompleted:  {}\nActive:     {}\nCompletion: {}%\n",
        stats.total, stats.completed, stats.active, stats.completion_rate
    )
}

pub fn format_motivation(motivation: &Motivation) -> String {
    format!("\"{}\"\n  tip: {}\n", motivation.motivation, motivation.tip)
}
