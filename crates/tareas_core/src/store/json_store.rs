//! Flat-file JSON backend.
//!
//! # Responsibility
//! - Persist the full collection as a pretty-printed JSON array.
//! - Recover tolerantly from missing or damaged files.
//!
//! # Invariants
//! - A missing file is the expected first-run state, never an error.
//! - One corrupt record never discards valid siblings.
//! - `save_all` replaces the file atomically; readers never observe a
//!   half-written collection.

use crate::model::task::Task;
use crate::store::{StorageError, StoreError, StoreResult, TaskStore};
use log::{info, warn};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// JSON-file-backed task store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonFileStore {
    fn load_all(&self) -> StoreResult<Vec<Task>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    "event=store_load module=store status=ok path={} detail=first_run",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => return Err(storage_failure(&self.path, err)),
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=degraded path={} error_code=corrupt_json error={err}",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
        };

        let entries = match value {
            Value::Array(entries) => entries,
            other => {
                warn!(
                    "event=store_load module=store status=degraded path={} error_code=not_a_list found={}",
                    self.path.display(),
                    json_type_name(&other)
                );
                return Ok(Vec::new());
            }
        };

        let mut tasks = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Task>(entry) {
                Ok(task) => match task.validate() {
                    Ok(()) => tasks.push(task),
                    Err(err) => warn!(
                        "event=store_load module=store status=degraded path={} index={index} error_code=invalid_record error={err}",
                        self.path.display()
                    ),
                },
                Err(err) => warn!(
                    "event=store_load module=store status=degraded path={} index={index} error_code=unreadable_record error={err}",
                    self.path.display()
                ),
            }
        }

        info!(
            "event=store_load module=store status=ok path={} count={}",
            self.path.display(),
            tasks.len()
        );
        Ok(tasks)
    }

    fn save_all(&self, tasks: &[Task]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| storage_failure(parent, err))?;
            }
        }

        let body = serde_json::to_string_pretty(tasks)
            .map_err(|err| storage_failure(&self.path, io::Error::other(err)))?;

        // Write a sibling temp file, then rename over the target so the old
        // collection survives any partial write.
        let tmp_path = sibling_tmp_path(&self.path);
        fs::write(&tmp_path, body).map_err(|err| storage_failure(&tmp_path, err))?;
        fs::rename(&tmp_path, &self.path).map_err(|err| storage_failure(&self.path, err))?;

        info!(
            "event=store_save module=store status=ok path={} count={}",
            self.path.display(),
            tasks.len()
        );
        Ok(())
    }
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn storage_failure(path: &Path, err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return StoreError::Storage(StorageError::PermissionDenied {
            path: path.to_path_buf(),
        });
    }
    StoreError::Storage(StorageError::Io {
        path: path.to_path_buf(),
        source: err,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
