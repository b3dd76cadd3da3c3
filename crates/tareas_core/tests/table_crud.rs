use tareas_core::db::{open_table_db, open_table_db_in_memory};
use tareas_core::{
    parse_due_date, Category, StoreError, TableTaskStore, Task, TaskDraft, TaskStore,
};
use tempfile::TempDir;
use uuid::Uuid;

fn draft(text: &str, date: Option<&str>) -> Task {
    TaskDraft {
        text: text.to_string(),
        date: date.map(str::to_string),
        ..TaskDraft::default()
    }
    .validate()
    .unwrap()
}

#[test]
fn insert_and_get_round_trips() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    let mut task = draft("Comprar pan", Some("05/06/2024"));
    task.category = Category::Shopping;
    task.urgent = true;
    let id = store.insert_task(&task).unwrap();

    let loaded = store.get_task(id).unwrap().expect("task should exist");
    assert_eq!(loaded, task);
}

#[test]
fn get_missing_task_returns_none() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    assert!(store.get_task(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn update_rewrites_row() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    let mut task = draft("Borrador", None);
    store.insert_task(&task).unwrap();

    task.text = "Version final".to_string();
    task.date = Some(parse_due_date("10/10/2025").unwrap());
    task.category = Category::Work;
    store.update_task(&task).unwrap();

    let loaded = store.get_task(task.id).unwrap().unwrap();
    assert_eq!(loaded, task);
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    let task = draft("Nunca insertada", None);
    let err = store.update_task(&task).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == task.id));
}

#[test]
fn set_completed_flips_row_state() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    let task = draft("Terminar informe", None);
    store.insert_task(&task).unwrap();

    store.set_completed(task.id, true).unwrap();
    assert!(store.get_task(task.id).unwrap().unwrap().completed);

    store.set_completed(task.id, false).unwrap();
    assert!(!store.get_task(task.id).unwrap().unwrap().completed);
}

#[test]
fn delete_not_found_returns_not_found() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    let missing = Uuid::new_v4();
    let err = store.delete_task(missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn load_all_orders_by_date_with_undated_last() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    let undated = draft("Sin fecha", None);
    let june = draft("Junio", Some("01/06/2024"));
    let january = draft("Enero", Some("01/01/2024"));
    store.insert_task(&undated).unwrap();
    store.insert_task(&june).unwrap();
    store.insert_task(&january).unwrap();

    let loaded = store.load_all().unwrap();
    let texts: Vec<&str> = loaded.iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, vec!["Enero", "Junio", "Sin fecha"]);
}

#[test]
fn save_all_replaces_previous_rows() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    store.insert_task(&draft("Vieja uno", None)).unwrap();
    store.insert_task(&draft("Vieja dos", None)).unwrap();

    let replacement = draft("Unica", None);
    store.save_all(&[replacement.clone()]).unwrap();

    assert_eq!(store.load_all().unwrap(), vec![replacement]);
}

#[test]
fn save_all_with_empty_collection_clears_table() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    store.insert_task(&draft("Se va", None)).unwrap();
    store.save_all(&[]).unwrap();

    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn load_all_skips_structurally_invalid_rows() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    store.insert_task(&draft("Valida", None)).unwrap();
    conn.execute(
        "INSERT INTO tareas (uuid, content, category) VALUES (?1, 'Categoria rota', 'nonsense');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO tareas (uuid, content, due_date, category) VALUES (?1, 'Fecha rota', '12-31-2024', 'other');",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].text, "Valida");
}

#[test]
fn validation_failure_blocks_insert_and_update() {
    let conn = open_table_db_in_memory().unwrap();
    let store = TableTaskStore::new(&conn);

    let mut invalid = draft("valida", None);
    invalid.text = "   ".to_string();

    let insert_err = store.insert_task(&invalid).unwrap_err();
    assert!(matches!(insert_err, StoreError::Validation(_)));

    let update_err = store.update_task(&invalid).unwrap_err();
    assert!(matches!(update_err, StoreError::Validation(_)));
}

#[test]
fn file_backed_table_persists_across_connections() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("tareas.db");

    let task = draft("Persistente", Some("20/08/2026"));
    {
        let conn = open_table_db(&db_path).unwrap();
        TableTaskStore::new(&conn).insert_task(&task).unwrap();
    }

    let conn = open_table_db(&db_path).unwrap();
    let loaded = TableTaskStore::new(&conn).load_all().unwrap();
    assert_eq!(loaded, vec![task]);
}
