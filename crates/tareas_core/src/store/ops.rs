//! Pure collection operations over a caller-owned task list.
//!
//! # Responsibility
//! - Mutate an in-memory collection by stable ID with explicit failure modes.
//!
//! # Invariants
//! - No operation here reads or writes a backing medium.
//! - A failed operation leaves the collection exactly as it was.

use crate::model::task::{Category, Task, TaskDraft, TaskId};
use crate::store::{StoreError, StoreResult};

/// Validates `draft`, appends the resulting task and returns its ID.
pub fn add(tasks: &mut Vec<Task>, draft: TaskDraft) -> StoreResult<TaskId> {
    let task = draft.validate()?;
    let id = task.id;
    tasks.push(task);
    Ok(id)
}

/// Removes the task with `id`.
pub fn remove(tasks: &mut Vec<Task>, id: TaskId) -> StoreResult<()> {
    let index = tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or(StoreError::NotFound(id))?;
    tasks.remove(index);
    Ok(())
}

/// Sets the completion flag of the task with `id`.
pub fn set_completed(tasks: &mut [Task], id: TaskId, value: bool) -> StoreResult<()> {
    find_mut(tasks, id)?.completed = value;
    Ok(())
}

/// Re-categorizes the task with `id`.
pub fn set_category(tasks: &mut [Task], id: TaskId, value: Category) -> StoreResult<()> {
    find_mut(tasks, id)?.category = value;
    Ok(())
}

/// Sets the urgency flag of the task with `id`.
pub fn set_urgent(tasks: &mut [Task], id: TaskId, value: bool) -> StoreResult<()> {
    find_mut(tasks, id)?.urgent = value;
    Ok(())
}

fn find_mut(tasks: &mut [Task], id: TaskId) -> StoreResult<&mut Task> {
    tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or(StoreError::NotFound(id))
}
