//! Applies one `Action` to the task store and renders the result.

use std::error::Error;
use std::fmt::{Display, Formatter};

use zentask_core::{Clock, TaskId, TaskRepository, TaskStore};

use crate::cli::Action;
use crate::output::{format_stats, format_task_list, short_id};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    UnknownId(String),
    AmbiguousId { prefix: String, matches: usize },
    EmptyText,
}

impl Display for ActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownId(prefix) => write!(f, "no task matches id '{prefix}'"),
            Self::AmbiguousId { prefix, matches } => {
                write!(f, "id '{prefix}' matches {matches} tasks; use a longer prefix")
            }
            Self::EmptyText => write!(f, "task text must not be empty; nothing changed"),
        }
    }
}

impl Error for ActionError {}

/// Finds the single task whose id starts with `prefix` (hyphens ignored).
pub fn resolve_id<R: TaskRepository, C: Clock>(
    store: &TaskStore<R, C>,
    prefix: &str,
) -> Result<TaskId, ActionError> {
    let needle = prefix.trim().replace('-', "").to_ascii_lowercase();
    if needle.is_empty() {
        return Err(ActionError::UnknownId(prefix.to_string()));
    }

    let matches: Vec<TaskId> = store
        .tasks()
        .iter()
        .filter(|task| task.id.simple().to_string().starts_with(&needle))
        .map(|task| task.id)
        .collect();

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(ActionError::UnknownId(prefix.to_string())),
        _ => Err(ActionError::AmbiguousId {
            prefix: prefix.to_string(),
            matches: matches.len(),
        }),
    }
}

pub fn apply<R: TaskRepository, C: Clock>(
    store: &mut TaskStore<R, C>,
    action: &Action,
) -> Result<String, ActionError> {
    match action {
        Action::Add { text, due, at } => {
            let task = store
                .create(&text.join(" "), *due, *at)
                .ok_or(ActionError::EmptyText)?;
            Ok(format!("Added {}", short_id(task.id)))
        }
        Action::List { filter } => Ok(format_task_list(store.filter(*filter), store.now())),
        Action::Toggle { id } => {
            let id = resolve_id(store, id)?;
            store.toggle_complete(id);
            let completed = store.get(id).is_some_and(|task| task.completed);
            Ok(if completed {
                format!("Completed {}", short_id(id))
            } else {
                format!("Reopened {}", short_id(id))
            })
        }
        Action::Edit {
            id,
            text,
            due,
            at,
            no_due,
            no_time,
        } => {
            let id = resolve_id(store, id)?;
            let current = store
                .get(id)
                .ok_or_else(|| ActionError::UnknownId(id.to_string()))?;
            let due_date = if *no_due { None } else { due.or(current.due_date) };
            let due_time = if *no_due || *no_time {
                None
            } else {
                at.or(current.due_time)
            };

            if !store.edit(id, &text.join(" "), due_date, due_time) {
                return Err(ActionError::EmptyText);
            }
            Ok(format!("Updated {}", short_id(id)))
        }
        Action::Rm { id } => {
            let id = resolve_id(store, id)?;
            store.delete(id);
            Ok(format!("Removed {}", short_id(id)))
        }
        Action::Stats => Ok(format_stats(&store.stats())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use zentask_core::{FixedClock, MemoryTaskRepository, TaskFilter};

    fn store() -> TaskStore<MemoryTaskRepository, FixedClock> {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        TaskStore::load(MemoryTaskRepository::default(), FixedClock::new(now)).unwrap()
    }

    fn add(store: &mut TaskStore<MemoryTaskRepository, FixedClock>, text: &str) -> TaskId {
        store.create(text, None, None).unwrap().id
    }

    #[test]
    fn resolve_id_accepts_unique_prefix_and_full_id() {
        let mut store = store();
        let id = add(&mut store, "a");

        let prefix = id.simple().to_string()[..6].to_string();
        assert_eq!(resolve_id(&store, &prefix), Ok(id));
        assert_eq!(resolve_id(&store, &id.to_string()), Ok(id));
        assert!(matches!(
            resolve_id(&store, "zzzz"),
            Err(ActionError::UnknownId(_))
        ));
        assert!(matches!(resolve_id(&store, ""), Err(ActionError::UnknownId(_))));
    }

    #[test]
    fn blank_add_reports_no_change() {
        let mut store = store();
        let action = Action::Add {
            text: vec!["  ".to_string()],
            due: None,
            at: None,
        };
        assert_eq!(apply(&mut store, &action), Err(ActionError::EmptyText));
        assert!(store.is_empty());
    }

    #[test]
    fn edit_keeps_deadline_unless_cleared() {
        let mut store = store();
        let date = NaiveDate::from_ymd_opt(2024, 1, 3);
        let time = NaiveTime::from_hms_opt(7, 30, 0);
        let id = store.create("run", date, time).unwrap().id;
        let full = id.to_string();

        let keep = Action::Edit {
            id: full.clone(),
            text: vec!["run".into(), "5k".into()],
            due: None,
            at: None,
            no_due: false,
            no_time: false,
        };
        apply(&mut store, &keep).unwrap();
        let task = store.get(id).unwrap();
        assert_eq!(task.text, "run 5k");
        assert_eq!((task.due_date, task.due_time), (date, time));

        let drop_time = Action::Edit {
            id: full.clone(),
            text: vec!["run".into()],
            due: None,
            at: None,
            no_due: false,
            no_time: true,
        };
        apply(&mut store, &drop_time).unwrap();
        assert_eq!(store.get(id).unwrap().due_time, None);
        assert_eq!(store.get(id).unwrap().due_date, date);

        let clear = Action::Edit {
            id: full,
            text: vec!["run".into()],
            due: None,
            at: None,
            no_due: true,
            no_time: false,
        };
        apply(&mut store, &clear).unwrap();
        assert_eq!(store.get(id).unwrap().due_date, None);
    }

    #[test]
    fn toggle_and_remove_by_prefix() {
        let mut store = store();
        let id = add(&mut store, "laundry");
        let prefix = id.simple().to_string()[..8].to_string();

        let message = apply(&mut store, &Action::Toggle { id: prefix.clone() }).unwrap();
        assert!(message.starts_with("Completed"));
        assert_eq!(store.filter(TaskFilter::Completed).count(), 1);

        apply(&mut store, &Action::Rm { id: prefix }).unwrap();
        assert!(store.is_empty());
    }
}
