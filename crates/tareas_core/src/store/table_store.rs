//! Table-mode backend with row-level operations.
//!
//! The original deployment of this data lives in a hosted `tareas` table
//! driven by row-level insert/update/delete; this backend carries that
//! contract over the local SQLite stack. Network transport and auth are the
//! hosting layer's problem, not this crate's.
//!
//! # Responsibility
//! - Provide the whole-collection `TaskStore` contract over the table.
//! - Expose row-level CRUD for callers that mutate one record at a time.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Listing order is due date ascending with undated rows last.
//! - Structurally invalid rows are skipped with a warning, never returned.

use crate::model::task::{Category, Task, TaskId};
use crate::store::{StoreError, StoreResult, TaskStore};
use chrono::NaiveDate;
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    content,
    due_date,
    category,
    completed,
    urgent
FROM tareas";

// ISO column format; distinct from the flat-file `DD/MM/YYYY` wire form.
const TABLE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Task store over a row-oriented `tareas` table.
pub struct TableTaskStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> TableTaskStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts one task as a new row.
    pub fn insert_task(&self, task: &Task) -> StoreResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tareas (uuid, content, due_date, category, completed, urgent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.id.to_string(),
                task.text.as_str(),
                date_to_db(task.date),
                task.category.wire_label(),
                bool_to_int(task.completed),
                bool_to_int(task.urgent),
            ],
        )?;

        Ok(task.id)
    }

    /// Rewrites the full row for `task.id`.
    pub fn update_task(&self, task: &Task) -> StoreResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tareas
             SET
                content = ?1,
                due_date = ?2,
                category = ?3,
                completed = ?4,
                urgent = ?5
             WHERE uuid = ?6;",
            params![
                task.text.as_str(),
                date_to_db(task.date),
                task.category.wire_label(),
                bool_to_int(task.completed),
                bool_to_int(task.urgent),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(task.id));
        }

        Ok(())
    }

    /// Flips the completion flag of one row.
    pub fn set_completed(&self, id: TaskId, value: bool) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE tareas SET completed = ?1 WHERE uuid = ?2;",
            params![bool_to_int(value), id.to_string()],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    /// Deletes one row. Tasks are removed outright; there is no tombstone.
    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tareas WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    /// Fetches one row by ID. A structurally invalid row is downgraded to a
    /// warning and reported as absent, matching the batch-load policy.
    pub fn get_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return match parse_task_row(row) {
                Ok(task) => Ok(Some(task)),
                Err(reason) => {
                    warn!(
                        "event=table_get module=store status=degraded uuid={id} error_code=invalid_row error={reason}"
                    );
                    Ok(None)
                }
            };
        }

        Ok(None)
    }
}

impl TaskStore for TableTaskStore<'_> {
    fn load_all(&self) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY due_date IS NULL, due_date ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            match parse_task_row(row) {
                Ok(task) => tasks.push(task),
                Err(reason) => warn!(
                    "event=table_load module=store status=degraded error_code=invalid_row error={reason}"
                ),
            }
        }

        info!(
            "event=table_load module=store status=ok count={}",
            tasks.len()
        );
        Ok(tasks)
    }

    fn save_all(&self, tasks: &[Task]) -> StoreResult<()> {
        for task in tasks {
            task.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tareas;", [])?;
        for task in tasks {
            tx.execute(
                "INSERT INTO tareas (uuid, content, due_date, category, completed, urgent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    task.id.to_string(),
                    task.text.as_str(),
                    date_to_db(task.date),
                    task.category.wire_label(),
                    bool_to_int(task.completed),
                    bool_to_int(task.urgent),
                ],
            )?;
        }
        tx.commit()?;

        info!(
            "event=table_save module=store status=ok count={}",
            tasks.len()
        );
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> Result<Task, String> {
    let uuid_text: String = row
        .get::<_, String>("uuid")
        .map_err(|err| err.to_string())?;
    let id = Uuid::parse_str(&uuid_text)
        .map_err(|_| format!("invalid uuid value `{uuid_text}` in tareas.uuid"))?;

    let date = match row
        .get::<_, Option<String>>("due_date")
        .map_err(|err| err.to_string())?
    {
        Some(value) => Some(
            NaiveDate::parse_from_str(&value, TABLE_DATE_FORMAT)
                .map_err(|_| format!("invalid date value `{value}` in tareas.due_date"))?,
        ),
        None => None,
    };

    let category_text: String = row
        .get::<_, String>("category")
        .map_err(|err| err.to_string())?;
    let category = Category::parse(&category_text)
        .ok_or_else(|| format!("invalid category `{category_text}` in tareas.category"))?;

    let task = Task {
        id,
        text: row.get("content").map_err(|err| err.to_string())?,
        date,
        completed: int_to_bool(row.get("completed").map_err(|err| err.to_string())?, "completed")?,
        category,
        urgent: int_to_bool(row.get("urgent").map_err(|err| err.to_string())?, "urgent")?,
    };
    task.validate().map_err(|err| err.to_string())?;
    Ok(task)
}

fn date_to_db(date: Option<NaiveDate>) -> Option<String> {
    date.map(|value| value.format(TABLE_DATE_FORMAT).to_string())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &str) -> Result<bool, String> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(format!("invalid {column} value `{other}` in tareas")),
    }
}
