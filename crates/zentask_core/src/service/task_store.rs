//! Task store and lifecycle operations.
//!
//! # Responsibility
//! - Own the ordered in-memory task collection.
//! - Apply create/toggle/edit/delete atomically and persist after each one.
//!
//! # Invariants
//! - New tasks are prepended; no other operation reorders.
//! - A store only exists after a successful load, so a save never replaces
//!   data that could not be read.
//! - Every operation either fully applies (and persists the whole collection)
//!   or leaves the store untouched and persists nothing.
//! - Changing a due date or due time re-arms the alarm (`notified = false`).

use crate::clock::Clock;
use crate::model::filter::{TaskFilter, TaskStats};
use crate::model::task::{normalize_text, truncate_to_minute, Task, TaskId};
use crate::ports::{Celebration, NoCelebration};
use crate::repo::task_repo::{RepoResult, TaskRepository};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, error, info};
use uuid::Uuid;

/// Explicitly owned task state with a defined mutation API.
pub struct TaskStore<R: TaskRepository, C: Clock> {
    tasks: Vec<Task>,
    repo: R,
    clock: C,
    celebration: Box<dyn Celebration>,
}

impl<R: TaskRepository, C: Clock> TaskStore<R, C> {
    /// Seeds the store from `repo`.
    ///
    /// # Errors
    /// Returns the repository error when the stored collection cannot be
    /// read. No store exists in that case, so nothing can overwrite the
    /// unreadable document.
    pub fn load(repo: R, clock: C) -> RepoResult<Self> {
        let tasks = repo.load().map_err(|err| {
            error!("event=store_load module=store status=error error={err}");
            err
        })?;
        info!(
            "event=store_load module=store status=ok count={}",
            tasks.len()
        );
        Ok(Self {
            tasks,
            repo,
            clock,
            celebration: Box::new(NoCelebration),
        })
    }

    /// Replaces the completion effect.
    pub fn with_celebration(mut self, celebration: impl Celebration + 'static) -> Self {
        self.celebration = Box::new(celebration);
        self
    }

    /// All tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Creates and prepends a task.
    ///
    /// Returns `None` and changes nothing when `text` is blank.
    pub fn create(
        &mut self,
        text: &str,
        due_date: Option<NaiveDate>,
        due_time: Option<NaiveTime>,
    ) -> Option<Task> {
        let Some(text) = normalize_text(text) else {
            debug!("event=task_create module=store status=noop reason=empty_text");
            return None;
        };

        let mut id = Uuid::new_v4();
        while self.get(id).is_some() {
            id = Uuid::new_v4();
        }

        let task = match Task::with_id(id, &text, self.clock.now_epoch_ms()) {
            Ok(task) => task.with_due(due_date, due_time),
            Err(err) => {
                debug!("event=task_create module=store status=noop reason={err}");
                return None;
            }
        };

        self.tasks.insert(0, task.clone());
        info!(
            "event=task_create module=store status=ok task_id={} has_due_date={} has_due_time={}",
            task.id,
            task.due_date.is_some(),
            task.due_time.is_some()
        );
        self.persist("task_create");
        Some(task)
    }

    /// Flips `completed`. Celebrates only on the false→true transition.
    ///
    /// Returns `false` when `id` is unknown. `notified` is never touched.
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=store status=noop reason=not_found task_id={id}");
            return false;
        };

        task.completed = !task.completed;
        let completed = task.completed;
        info!("event=task_toggle module=store status=ok task_id={id} completed={completed}");
        self.persist("task_toggle");

        if completed {
            self.celebration.celebrate();
        }
        true
    }

    /// Replaces text and deadline fields of an existing task.
    ///
    /// Returns `false` and changes nothing when `text` is blank or `id` is
    /// unknown. `notified` survives only if both due fields are unchanged.
    pub fn edit(
        &mut self,
        id: TaskId,
        text: &str,
        due_date: Option<NaiveDate>,
        due_time: Option<NaiveTime>,
    ) -> bool {
        let Some(text) = normalize_text(text) else {
            debug!("event=task_edit module=store status=noop reason=empty_text task_id={id}");
            return false;
        };
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_edit module=store status=noop reason=not_found task_id={id}");
            return false;
        };

        let due_time = due_time.map(truncate_to_minute);
        let deadline_unchanged = task.due_date == due_date && task.due_time == due_time;

        task.text = text;
        task.due_date = due_date;
        task.due_time = due_time;
        if !deadline_unchanged {
            task.notified = false;
        }

        info!(
            "event=task_edit module=store status=ok task_id={id} alarm_rearmed={}",
            !deadline_unchanged
        );
        self.persist("task_edit");
        true
    }

    /// Permanently removes a task. Returns `false` when `id` is unknown.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_delete module=store status=noop reason=not_found task_id={id}");
            return false;
        }

        info!("event=task_delete module=store status=ok task_id={id}");
        self.persist("task_delete");
        true
    }

    /// Tasks matching `mode`, in store order.
    pub fn filter(&self, mode: TaskFilter) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| mode.matches(task))
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Whole completion percentage; 0 for an empty store.
    pub fn completion_rate(&self) -> u8 {
        self.stats().completion_rate
    }

    /// Number of incomplete tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    /// Marks every alarm candidate due exactly at `date` `time` as notified.
    ///
    /// Persists only when at least one task changed. Returns the tasks that
    /// fired, in store order.
    pub(crate) fn mark_due_notified(&mut self, date: NaiveDate, time: NaiveTime) -> Vec<Task> {
        let mut fired = Vec::new();
        for task in &mut self.tasks {
            if task.is_alarm_candidate() && task.due_minute() == Some((date, time)) {
                task.notified = true;
                fired.push(task.clone());
            }
        }

        if !fired.is_empty() {
            self.persist("alarm_fire");
        }
        fired
    }

    fn persist(&self, event: &str) {
        if let Err(err) = self.repo.save(&self.tasks) {
            error!(
                "event=store_save module=store status=error cause={event} count={} error={err}",
                self.tasks.len()
            );
        }
    }
}
