//! Local SQLite storage.
//!
//! # Responsibility
//! - Locate and open the database that backs the key-value task store.
//! - Keep its schema current through `migrations`.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Task data is never read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// File name of the task database inside the data directory.
pub const DB_FILE_NAME: &str = "zentask.sqlite3";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    DataDir {
        path: PathBuf,
        source: std::io::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::DataDir { path, source } => write!(
                f,
                "failed to prepare data directory `{}`: {source}",
                path.display()
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::DataDir { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Creates `data_dir` if needed and opens the task database inside it.
pub fn open_data_dir(data_dir: impl Into<PathBuf>) -> DbResult<rusqlite::Connection> {
    let data_dir = data_dir.into();
    std::fs::create_dir_all(&data_dir).map_err(|source| DbError::DataDir {
        path: data_dir.clone(),
        source,
    })?;
    open_db(data_dir.join(DB_FILE_NAME))
}
