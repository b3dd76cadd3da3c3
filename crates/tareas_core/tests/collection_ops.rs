use tareas_core::{
    add, remove, set_category, set_completed, set_urgent, Category, StoreError, Task, TaskDraft,
    TaskValidationError,
};
use uuid::Uuid;

fn seeded() -> Vec<Task> {
    vec![
        TaskDraft::new("Comprar leche").validate().unwrap(),
        TaskDraft::new("Estudiar Rust").validate().unwrap(),
    ]
}

#[test]
fn add_validates_normalizes_and_appends() {
    let mut tasks = seeded();

    let id = add(&mut tasks, TaskDraft::new("  Llamar al banco  ")).unwrap();

    assert_eq!(tasks.len(), 3);
    let added = tasks.last().unwrap();
    assert_eq!(added.id, id);
    assert_eq!(added.text, "Llamar al banco");
    assert_eq!(added.category, Category::Other);
}

#[test]
fn add_rejects_invalid_draft_and_leaves_collection_unchanged() {
    let mut tasks = seeded();

    let err = add(&mut tasks, TaskDraft::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TaskValidationError::EmptyText)
    ));
    assert_eq!(tasks.len(), 2);
}

#[test]
fn remove_deletes_matching_task() {
    let mut tasks = seeded();
    let target = tasks[0].id;

    remove(&mut tasks, target).unwrap();

    assert_eq!(tasks.len(), 1);
    assert!(tasks.iter().all(|task| task.id != target));
}

#[test]
fn remove_unknown_id_fails_and_leaves_collection_unchanged() {
    let mut tasks = seeded();
    let missing = Uuid::new_v4();

    let err = remove(&mut tasks, missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    assert_eq!(tasks.len(), 2);
}

#[test]
fn set_completed_targets_one_task() {
    let mut tasks = seeded();
    let target = tasks[1].id;

    set_completed(&mut tasks, target, true).unwrap();

    assert!(!tasks[0].completed);
    assert!(tasks[1].completed);

    set_completed(&mut tasks, target, false).unwrap();
    assert!(!tasks[1].completed);
}

#[test]
fn set_category_targets_one_task() {
    let mut tasks = seeded();
    let target = tasks[0].id;

    set_category(&mut tasks, target, Category::Shopping).unwrap();

    assert_eq!(tasks[0].category, Category::Shopping);
    assert_eq!(tasks[1].category, Category::Other);
}

#[test]
fn set_urgent_targets_one_task() {
    let mut tasks = seeded();
    let target = tasks[0].id;

    set_urgent(&mut tasks, target, true).unwrap();
    assert!(tasks[0].urgent);

    set_urgent(&mut tasks, target, false).unwrap();
    assert!(!tasks[0].urgent);
}

#[test]
fn mutators_report_not_found_for_stale_ids() {
    let mut tasks = seeded();
    let missing = Uuid::new_v4();

    assert!(matches!(
        set_completed(&mut tasks, missing, true).unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        set_category(&mut tasks, missing, Category::Work).unwrap_err(),
        StoreError::NotFound(_)
    ));
    assert!(matches!(
        set_urgent(&mut tasks, missing, true).unwrap_err(),
        StoreError::NotFound(_)
    ));
}
