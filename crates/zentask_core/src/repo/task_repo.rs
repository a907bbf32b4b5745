//! Task collection persistence.
//!
//! # Responsibility
//! - Load the whole task collection once at startup.
//! - Save the whole collection (never deltas) after every mutation.
//!
//! # Invariants
//! - The collection is stored as a single JSON document under one key.
//! - Loaded data is validated; duplicate IDs are rejected instead of masked.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::task::{Task, TaskId};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Key under which the task collection is stored.
pub const TASKS_KEY: &str = "zentask_todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for task collection load/save.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode task collection: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator for the task store.
pub trait TaskRepository {
    /// Returns the stored collection, or an empty one when nothing is stored.
    fn load(&self) -> RepoResult<Vec<Task>>;
    /// Replaces the stored collection with `tasks`.
    fn save(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// SQLite `kv_store` backed repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
    key: &'static str,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates a repository after checking the connection is fully migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let version = schema_version(conn)?;
        if version != latest_version() {
            return Err(RepoError::InvalidData(format!(
                "schema version {version} does not match expected {}",
                latest_version()
            )));
        }
        Ok(Self {
            conn,
            key: TASKS_KEY,
        })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn load(&self) -> RepoResult<Vec<Task>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(document) => decode_tasks(&document),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        let document = serde_json::to_string(tasks).map_err(RepoError::Encode)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.key, document],
        )?;
        Ok(())
    }
}

/// Parses a stored JSON document into a validated task collection.
pub fn decode_tasks(document: &str) -> RepoResult<Vec<Task>> {
    let tasks: Vec<Task> = serde_json::from_str(document)
        .map_err(|err| RepoError::InvalidData(format!("{TASKS_KEY}: {err}")))?;

    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate task id {} in {TASKS_KEY}",
                task.id
            )));
        }
    }
    Ok(tasks)
}

/// In-process repository. Clones share the same backing collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskRepository {
    tasks: Rc<RefCell<Vec<Task>>>,
    saves: Rc<Cell<usize>>,
    fail_saves: Rc<Cell<bool>>,
}

impl MemoryTaskRepository {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Rc::new(RefCell::new(tasks)),
            ..Self::default()
        }
    }

    /// Last saved collection.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// Makes subsequent saves fail, simulating a storage quota error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }
}

impl TaskRepository for MemoryTaskRepository {
    fn load(&self) -> RepoResult<Vec<Task>> {
        Ok(self.tasks.borrow().clone())
    }

    fn save(&self, tasks: &[Task]) -> RepoResult<()> {
        if self.fail_saves.get() {
            return Err(RepoError::InvalidData("storage quota exceeded".to_string()));
        }
        *self.tasks.borrow_mut() = tasks.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
