use campusdesk_core::store::migrations::latest_version;
use campusdesk_core::store::{Direction, Fields};
use campusdesk_core::{DocumentQuery, DocumentStore, SqliteDocumentStore, StoreError};
use rusqlite::Connection;
use serde_json::{json, Value};

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn add_assigns_distinct_ids_and_get_reads_back() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let first = store
        .add("banners", &fields(json!({"imageUrl": "https://cdn/a.jpg", "uploadedAt": 1})))
        .unwrap();
    let second = store
        .add("banners", &fields(json!({"imageUrl": "https://cdn/b.jpg", "uploadedAt": 2})))
        .unwrap();
    assert_ne!(first, second);

    let doc = store.get("banners", &first).unwrap().unwrap();
    assert_eq!(doc.id, first);
    assert_eq!(doc.fields["imageUrl"], "https://cdn/a.jpg");
    assert!(store.get("banners", "missing").unwrap().is_none());
    assert!(store.get("gallery", &first).unwrap().is_none());
}

#[test]
fn set_creates_then_replaces_whole_body() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    store
        .set("faculty", "f1", &fields(json!({"name": "A", "phone": "123"})))
        .unwrap();
    store.set("faculty", "f1", &fields(json!({"name": "B"}))).unwrap();

    let doc = store.get("faculty", "f1").unwrap().unwrap();
    assert_eq!(doc.fields["name"], "B");
    assert!(!doc.fields.contains_key("phone"));
}

#[test]
fn update_merges_and_requires_existing_document() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    store
        .set("timetable", "t1", &fields(json!({"subject": "Math", "isActive": true})))
        .unwrap();
    store
        .update("timetable", "t1", &fields(json!({"isActive": false})))
        .unwrap();

    let doc = store.get("timetable", "t1").unwrap().unwrap();
    assert_eq!(doc.fields["subject"], "Math");
    assert_eq!(doc.fields["isActive"], false);

    let err = store
        .update("timetable", "nope", &fields(json!({"isActive": false})))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn delete_is_idempotent() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    store.set("notices", "n1", &fields(json!({"title": "x"}))).unwrap();
    store.delete("notices", "n1").unwrap();
    store.delete("notices", "n1").unwrap();
    assert!(store.get("notices", "n1").unwrap().is_none());
}

#[test]
fn query_filters_on_booleans_and_orders() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    store
        .set("faculty", "a", &fields(json!({"name": "Zed", "isActive": true})))
        .unwrap();
    store
        .set("faculty", "b", &fields(json!({"name": "Amy", "isActive": true})))
        .unwrap();
    store
        .set("faculty", "c", &fields(json!({"name": "Bob", "isActive": false})))
        .unwrap();

    let query = DocumentQuery::new()
        .where_eq("isActive", true)
        .order_by("name", Direction::Ascending);
    let names: Vec<String> = store
        .query("faculty", &query)
        .unwrap()
        .into_iter()
        .map(|doc| doc.fields["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Amy", "Zed"]);
}

#[test]
fn query_descending_with_limit() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    for (id, at) in [("x", 10), ("y", 30), ("z", 20)] {
        store
            .set("gallery", id, &fields(json!({"imageUrl": "u", "uploadedAt": at})))
            .unwrap();
    }

    let query = DocumentQuery::new()
        .order_by("uploadedAt", Direction::Descending)
        .limit(2);
    let ids: Vec<String> = store
        .query("gallery", &query)
        .unwrap()
        .into_iter()
        .map(|doc| doc.id)
        .collect();
    assert_eq!(ids, vec!["y", "z"]);
}

#[test]
fn query_rejects_nested_field_paths() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let err = store
        .query("faculty", &DocumentQuery::new().where_eq("a.b", 1))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidFieldPath(_)));
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campusdesk.sqlite3");

    {
        let store = SqliteDocumentStore::open(&path).unwrap();
        store
            .set("college_info", "profile", &fields(json!({"name": "City College"})))
            .unwrap();
    }

    let store = SqliteDocumentStore::open(&path).unwrap();
    let doc = store.get("college_info", "profile").unwrap().unwrap();
    assert_eq!(doc.fields["name"], "City College");

    let conn = Connection::open(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", latest_version() + 1)
            .unwrap();
    }

    let err = match SqliteDocumentStore::open(&path) {
        Ok(_) => panic!("newer schema must be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, StoreError::UnsupportedSchemaVersion { .. }));
}
