//! Core domain logic for the tareas task list.
//! This crate is the single source of truth for task rules and persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    format_due_date, parse_due_date, Category, Task, TaskDraft, TaskId, TaskValidationError,
};
pub use query::views::{
    filter, is_due_this_week, is_due_today, is_overdue, sorted_by, summarize, DateBucket, SortKey,
    Stats, StatusIndicator, TaskFilter,
};
pub use store::{
    add, remove, set_category, set_completed, set_urgent, JsonFileStore, StorageError, StoreError,
    StoreResult, TableTaskStore, TaskStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
