//! Task domain model.
//!
//! # Responsibility
//! - Define the single tracked entity and its persisted wire shape.
//! - Normalize and validate user-facing fields (text, due date, due time).
//!
//! # Invariants
//! - `id` is a non-nil UUID and never changes after creation.
//! - `text` is stored trimmed and is never empty.
//! - `due_time` has minute granularity (seconds are always zero).

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
const DUE_TIME_FORMAT: &str = "%H:%M";

/// Task priority. Carried through persistence, not used by any rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A single trackable to-do item with an optional deadline.
///
/// Serialized with camelCase keys; absent due fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    /// Unix epoch milliseconds at creation.
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Only meaningful together with `due_date`.
    #[serde(skip_serializing_if = "Option::is_none", with = "hh_mm")]
    pub due_time: Option<NaiveTime>,
    /// Set once the alarm scanner has fired for the current deadline.
    pub notified: bool,
}

/// Validation errors for task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    NilId,
    EmptyText,
    InvalidDueDate(String),
    InvalidDueTime(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::InvalidDueDate(raw) => {
                write!(f, "invalid due date `{raw}`; expected YYYY-MM-DD")
            }
            Self::InvalidDueTime(raw) => write!(f, "invalid due time `{raw}`; expected HH:MM"),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates an incomplete, unnotified task with a generated ID.
    ///
    /// `text` is trimmed; whitespace-only input is rejected.
    pub fn new(text: &str, created_at: i64) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), text, created_at)
    }

    /// Creates a task with a caller-provided ID.
    pub fn with_id(id: TaskId, text: &str, created_at: i64) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            text: normalize_text(text).ok_or(TaskValidationError::EmptyText)?,
            completed: false,
            priority: Priority::Medium,
            created_at,
            due_date: None,
            due_time: None,
            notified: false,
        };
        task.validate()?;
        Ok(task)
    }

    /// Sets the deadline fields, truncating the time to the minute.
    pub fn with_due(mut self, due_date: Option<NaiveDate>, due_time: Option<NaiveTime>) -> Self {
        self.due_date = due_date;
        self.due_time = due_time.map(truncate_to_minute);
        self
    }

    /// Validates invariants that hold for every persisted task.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Returns the due minute when both due date and due time are set.
    pub fn due_minute(&self) -> Option<(NaiveDate, NaiveTime)> {
        Some((self.due_date?, self.due_time?))
    }

    /// Whether the alarm scanner should consider this task at all.
    pub fn is_alarm_candidate(&self) -> bool {
        !self.completed && !self.notified && self.due_minute().is_some()
    }
}

/// Trims `raw` and returns `None` when nothing is left.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses a `YYYY-MM-DD` due date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, TaskValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT)
        .map_err(|_| TaskValidationError::InvalidDueDate(raw.to_string()))
}

/// Parses an `HH:MM` due time.
pub fn parse_due_time(raw: &str) -> Result<NaiveTime, TaskValidationError> {
    NaiveTime::parse_from_str(raw.trim(), DUE_TIME_FORMAT)
        .map_err(|_| TaskValidationError::InvalidDueTime(raw.to_string()))
}

/// Formats a due time the way it is persisted and displayed.
pub fn format_due_time(time: NaiveTime) -> String {
    time.format(DUE_TIME_FORMAT).to_string()
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Deserialization shape; converted into `Task` through validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    created_at: i64,
    #[serde(default, with = "blank_date")]
    due_date: Option<NaiveDate>,
    #[serde(default, with = "hh_mm")]
    due_time: Option<NaiveTime>,
    #[serde(default)]
    notified: bool,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let task = Self {
            id: record.id,
            text: record.text,
            completed: record.completed,
            priority: record.priority,
            created_at: record.created_at,
            due_date: record.due_date,
            due_time: record.due_time.map(truncate_to_minute),
            notified: record.notified,
        };
        task.validate()?;
        Ok(task)
    }
}

/// `Option<NaiveTime>` as `"HH:MM"`; empty strings read as absent.
mod hh_mm {
    use super::{format_due_time, parse_due_time};
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => s.serialize_str(&format_due_time(*time)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_due_time(value).map(Some).map_err(de::Error::custom),
        }
    }
}

/// `Option<NaiveDate>` reader that treats empty strings as absent.
mod blank_date {
    use super::parse_due_date;
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_due_date(value).map(Some).map_err(de::Error::custom),
        }
    }
}
