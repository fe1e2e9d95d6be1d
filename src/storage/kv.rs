//! Key/value persistence for JSON collections
//!
//! Each collection (users, applications, audit entries) lives as one JSON
//! array under a fixed key, mirroring the browser-storage layout the portal
//! uses.

use crate::error::{Result, SarthiError};
use crate::storage::Database;
use ahash::{HashMap, HashMapExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Mutex;

/// String-keyed store of serialized values
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<bool>;
}

/// SQLite-backed store
pub struct SqliteKv {
    db: Database,
}

impl SqliteKv {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.db.get_value(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.db.put_value(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        self.db.delete_value(key)
    }
}

/// Process-local store, used by tests and dry runs
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.remove(key).is_some())
    }
}

/// Read and decode the value under `key`.
///
/// Missing keys, unreadable backends and corrupt JSON all yield `None`;
/// callers treat that as "no data".
pub fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Discarding corrupt data under {}: {}", key, e);
            None
        }
    }
}

/// Encode `value` and store it under `key`
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| SarthiError::Json {
        source: e,
        context: format!("Failed to serialize {}", key),
    })?;
    store.put(key, &raw)
}
