use std::fs;
use std::path::PathBuf;
use tareas_core::{Category, JsonFileStore, TaskDraft, TaskStore};
use tempfile::TempDir;

fn store_at(dir: &TempDir) -> (JsonFileStore, PathBuf) {
    let path = dir.path().join("tareas.json");
    (JsonFileStore::new(&path), path)
}

#[test]
fn load_missing_file_returns_empty() {
    let dir = TempDir::new().unwrap();
    let (store, _path) = store_at(&dir);

    let tasks = store.load_all().unwrap();
    assert!(tasks.is_empty());
}

#[test]
fn save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let (store, _path) = store_at(&dir);

    let first = TaskDraft {
        text: "Comprar leche".to_string(),
        date: Some("01/01/2020".to_string()),
        category: Some(Category::Shopping),
        urgent: false,
    }
    .validate()
    .unwrap();
    let second = TaskDraft::new("Estudiar Rust").validate().unwrap();

    store.save_all(&[first.clone(), second.clone()]).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded, vec![first, second]);
}

#[test]
fn corrupt_json_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let (store, path) = store_at(&dir);
    fs::write(&path, "{ this is not json").unwrap();

    let tasks = store.load_all().unwrap();
    assert!(tasks.is_empty());
}

#[test]
fn non_list_payload_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    let (store, path) = store_at(&dir);
    fs::write(&path, r#"{"text": "not a list"}"#).unwrap();

    let tasks = store.load_all().unwrap();
    assert!(tasks.is_empty());
}

#[test]
fn malformed_record_is_skipped_and_valid_siblings_kept() {
    let dir = TempDir::new().unwrap();
    let (store, path) = store_at(&dir);
    fs::write(
        &path,
        r#"[
            {"text": "Tarea valida", "date": "15/03/2024"},
            {"completed": true},
            {"text": "", "completed": false},
            {"text": "Fecha rota", "date": "99/99/9999"}
        ]"#,
    )
    .unwrap();

    let tasks = store.load_all().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "Tarea valida");
}

#[test]
fn legacy_records_without_ids_load_with_fresh_ids() {
    let dir = TempDir::new().unwrap();
    let (store, path) = store_at(&dir);
    fs::write(
        &path,
        r#"[
            {"text": "Vieja tarea", "date": "01/02/2023", "completed": false},
            {"text": "Otra vieja", "completed": true}
        ]"#,
    )
    .unwrap();

    let tasks = store.load_all().unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(!tasks[0].id.is_nil());
    assert_ne!(tasks[0].id, tasks[1].id);
    assert_eq!(tasks[0].category, Category::Other);
}

#[test]
fn save_empty_collection_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let (store, path) = store_at(&dir);

    let task = TaskDraft::new("Se borra todo").validate().unwrap();
    store.save_all(&[task]).unwrap();
    store.save_all(&[]).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deep").join("tareas.json");
    let store = JsonFileStore::new(&path);

    let task = TaskDraft::new("Anidada").validate().unwrap();
    store.save_all(&[task.clone()]).unwrap();

    assert_eq!(store.load_all().unwrap(), vec![task]);
}

#[test]
fn save_leaves_no_temp_file_behind() {
    let dir = TempDir::new().unwrap();
    let (store, path) = store_at(&dir);

    let task = TaskDraft::new("Sin residuos").validate().unwrap();
    store.save_all(&[task]).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries, vec![path]);
}
