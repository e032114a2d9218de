// crates/core/tests/object_store.rs

mod common;

use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;
use zcall_core::registry::{ObjectStore, RawEntry, RegistryLookup, StoreError};

use common::function_entry;

#[test]
fn upsert_fetch_list_and_delete() {
    let store = ObjectStore::open_in_memory().expect("open store");
    let entry = function_entry("Z10001", "Z6", &["Z6"]);

    assert!(store.upsert(&entry).expect("insert"), "first insert changes the store");
    assert!(!store.upsert(&entry).expect("re-insert"), "identical content is a no-op");

    let fetched = store.fetch("Z10001").expect("fetch").expect("present");
    assert_eq!(fetched, entry);
    assert!(store.fetch("Z99999").expect("fetch missing").is_none());

    let listed = store.list().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].zid, "Z10001");
    assert_eq!(listed[0].label.as_deref(), Some("label of Z10001"));
    assert_eq!(listed[0].kind.as_deref(), Some("Z8"));
    assert_eq!(listed[0].content_hash.len(), 64);

    assert!(store.delete("Z10001").expect("delete"));
    assert!(!store.delete("Z10001").expect("delete again"));
    assert!(store.list().expect("list").is_empty());
}

#[test]
fn changed_content_replaces_row() {
    let store = ObjectStore::open_in_memory().expect("open store");
    store.upsert(&function_entry("Z10001", "Z6", &["Z6"])).expect("insert");
    let before = store.list().expect("list")[0].content_hash.clone();

    let changed = function_entry("Z10001", "Z6", &["Z6", "Z6"]);
    assert!(store.upsert(&changed).expect("update"));

    let after = store.list().expect("list")[0].content_hash.clone();
    assert_ne!(before, after);
    let fetched = store.fetch("Z10001").expect("fetch").expect("present");
    assert_eq!(fetched.signature().expect("signature").arguments.len(), 2);
}

#[test]
fn list_is_ordered_by_zid_and_keeps_non_functions() {
    let store = ObjectStore::open_in_memory().expect("open store");
    store.upsert(&function_entry("Z20000", "Z6", &[])).expect("insert");
    store
        .upsert(&RawEntry::new("Z11", json!({"Z1K1": "Z2", "Z2K2": {"Z1K1": "Z4"}})))
        .expect("insert type");
    store.upsert(&RawEntry::new("Z12", json!("bare string"))).expect("insert malformed");

    let listed = store.list().expect("list");
    let zids: Vec<_> = listed.iter().map(|o| o.zid.as_str()).collect();
    assert_eq!(zids, vec!["Z11", "Z12", "Z20000"]);
    assert_eq!(listed[0].kind.as_deref(), Some("Z4"));
    assert_eq!(listed[1].kind, None);
}

#[test]
fn store_serves_as_registry() {
    let tmp = tempdir().expect("temp dir");
    let path = tmp.path().join("objects.db");
    {
        let store = ObjectStore::open(&path).expect("open store");
        store.upsert(&function_entry("Z10001", "Z6", &["Z6"])).expect("insert");
    }

    // Reopening keeps the data and does not re-run migrations destructively.
    let store = ObjectStore::open(&path).expect("reopen store");
    let registry: &dyn RegistryLookup = &store;
    assert!(registry.resolve_by_name("Z10001").is_some());
    assert!(registry.resolve_by_name("Z10002").is_none());
}

#[test]
fn corrupt_row_resolves_as_missing() {
    let tmp = tempdir().expect("temp dir");
    let path = tmp.path().join("objects.db");
    let store = ObjectStore::open(&path).expect("open store");

    {
        let conn = Connection::open(&path).expect("open raw sqlite db");
        conn.execute(
            "INSERT INTO zobjects (zid, content, updated_at) VALUES ('Z666', '{not json', 'now')",
            [],
        )
        .expect("insert corrupt row");
    }

    match store.fetch("Z666") {
        Err(StoreError::Content { zid, .. }) => assert_eq!(zid, "Z666"),
        other => panic!("expected content error, got {other:?}"),
    }
    assert!(store.resolve_by_name("Z666").is_none());
}

#[test]
fn open_errors_on_unsupported_schema_version() {
    let tmp = tempdir().expect("temp dir");
    let path = tmp.path().join("objects.db");
    {
        let conn = Connection::open(&path).expect("open raw sqlite db");
        conn.pragma_update(None, "user_version", 99_i32).expect("set user_version pragma");
    }

    match ObjectStore::open(&path) {
        Err(StoreError::UnsupportedSchemaVersion { found, min_supported, max_supported }) => {
            assert_eq!(found, 99);
            assert_eq!(min_supported, 0);
            assert_eq!(max_supported, 2);
        }
        Err(err) => panic!("expected UnsupportedSchemaVersion, got {err}"),
        Ok(_) => panic!("expected UnsupportedSchemaVersion, got Ok(_)"),
    }
}

#[test]
fn version_one_database_is_migrated() {
    let tmp = tempdir().expect("temp dir");
    let path = tmp.path().join("objects.db");
    {
        let conn = Connection::open(&path).expect("open raw sqlite db");
        conn.execute_batch(
            r#"
            CREATE TABLE zobjects (
                zid        TEXT PRIMARY KEY,
                content    TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            PRAGMA user_version = 1;
            "#,
        )
        .expect("create v1 schema");
    }

    let store = ObjectStore::open(&path).expect("migrate");
    store.upsert(&function_entry("Z10001", "Z6", &[])).expect("insert after migration");
    assert_eq!(store.list().expect("list").len(), 1);

    let conn = Connection::open(&path).expect("open raw sqlite db");
    let version: i32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0)).expect("read version");
    assert_eq!(version, 2);
}
