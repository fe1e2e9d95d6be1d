use rusqlite::params;
use sarthi::clock::SystemClock;
use sarthi::records::{ApplicationRecords, UserRecords, APPLICATIONS_KEY, USERS_KEY};
use sarthi::storage::{read_json, KvStore, StorageManager};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_real_storage_creation() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("sarthi-data");

    let storage = StorageManager::new(base.clone(), "sarthi.db").expect("Failed to create storage");

    let db_path = base.join("sarthi.db");
    assert!(db_path.exists(), "Database file should exist");
    assert_eq!(storage.db_path(), db_path.as_path());
    println!("✓ Database created at: {:?}", db_path);

    let conn = storage
        .database()
        .get_conn()
        .expect("Failed to get connection");
    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0))
        .expect("Failed to read migrations");
    assert_eq!(applied, 1);

    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params!["kv_entries"],
            |row| row.get(0),
        )
        .expect("Failed to query schema");
    assert_eq!(tables, 1, "kv_entries table should exist");
}

#[test]
fn test_seed_writes_collections() {
    let temp_dir = TempDir::new().unwrap();
    let storage = StorageManager::new(temp_dir.path().to_path_buf(), "sarthi.db").unwrap();
    let kv = storage.kv();

    assert!(UserRecords::new(kv.clone()).seed().unwrap());
    assert!(ApplicationRecords::new(kv.clone(), Arc::new(SystemClock))
        .seed()
        .unwrap());

    let users: Vec<serde_json::Value> = read_json(kv.as_ref(), USERS_KEY).expect("users stored");
    let apps: Vec<serde_json::Value> =
        read_json(kv.as_ref(), APPLICATIONS_KEY).expect("applications stored");
    assert_eq!(users.len(), 13);
    assert_eq!(apps.len(), 8);
    assert_eq!(apps[0]["status"], "pending");
    assert_eq!(apps[1]["statusHistory"].as_array().map(Vec::len), Some(3));

    let stats = storage.stats().unwrap();
    assert_eq!(stats.db.entry_count, 2);
    assert!(stats.db.total_size_bytes > 0);
}

#[test]
fn test_corrupt_collection_reads_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let storage = StorageManager::new(temp_dir.path().to_path_buf(), "sarthi.db").unwrap();
    let kv = storage.kv();

    kv.put(USERS_KEY, "not json at all").unwrap();
    let users = UserRecords::new(kv.clone());
    assert!(users.all().is_empty());

    // A corrupt collection counts as absent, so seeding repairs it
    assert!(users.seed().unwrap());
    assert_eq!(users.all().len(), 13);
}
