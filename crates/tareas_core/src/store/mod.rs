//! Task store contracts and backend implementations.
//!
//! # Responsibility
//! - Define the storage error taxonomy and the `TaskStore` contract.
//! - Host the flat-file and table backends plus pure collection operations.
//!
//! # Invariants
//! - Collection operations never touch the backing medium; persistence is an
//!   explicit `save_all` by the caller, so a failed save keeps the in-memory
//!   edit.
//! - Corrupt persisted data degrades to warnings and partial results; only
//!   environment problems surface as errors.

use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_store;
pub mod ops;
pub mod table_store;

pub use json_store::JsonFileStore;
pub use ops::{add, remove, set_category, set_completed, set_urgent};
pub use table_store::TableTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Environment-level failure of a backing medium.
#[derive(Debug)]
pub enum StorageError {
    /// The medium exists but access was refused.
    PermissionDenied { path: PathBuf },
    /// Any other read/write failure on the flat-file medium.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The table medium failed to answer.
    Unavailable(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied { path } => {
                write!(f, "permission denied for `{}`", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "i/o failure on `{}`: {source}", path.display())
            }
            Self::Unavailable(err) => write!(f, "task table unavailable: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PermissionDenied { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Unavailable(err) => Some(err),
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Unavailable(value)
    }
}

/// Store-level error for persistence and collection operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    Storage(StorageError),
    NotFound(TaskId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(StorageError::Unavailable(value))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Unavailable(DbError::Sqlite(value)))
    }
}

/// Contract every backing medium implements.
///
/// The store is the sole owner of persisted state; callers hold a working
/// copy and re-synchronize through these two entry points.
pub trait TaskStore {
    /// Reads the full collection, tolerating missing or damaged data.
    fn load_all(&self) -> StoreResult<Vec<Task>>;

    /// Atomically replaces the persisted collection with `tasks`.
    fn save_all(&self, tasks: &[Task]) -> StoreResult<()>;
}
