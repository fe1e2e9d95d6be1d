//! Storage layer for Sarthi
//!
//! Provides the SQLite database and the key/value view the record layer and
//! audit log persist through

pub mod database;
pub mod kv;

use crate::error::{Result, SarthiError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use database::{Database, DbPool, DbStats};
pub use kv::{read_json, write_json, KvStore, MemoryKv, SqliteKv};

/// Storage manager owning the data directory and its database
pub struct StorageManager {
    kv: Arc<SqliteKv>,
    base_path: PathBuf,
    db_path: PathBuf,
}

impl StorageManager {
    /// Create the data directory (if needed) and open the database inside it
    pub fn new(base_path: PathBuf, database_file: &str) -> Result<Self> {
        std::fs::create_dir_all(&base_path).map_err(|e| SarthiError::Io {
            source: e,
            context: format!("Failed to create data directory: {}", base_path.display()),
        })?;

        let db_path = base_path.join(database_file);
        let database = Database::new(&db_path)?;

        Ok(Self {
            kv: Arc::new(SqliteKv::new(database)),
            base_path,
            db_path,
        })
    }

    /// Shared handle to the key/value store
    pub fn kv(&self) -> Arc<dyn KvStore> {
        self.kv.clone()
    }

    /// The underlying database, for maintenance and inspection
    pub fn database(&self) -> &Database {
        self.kv.database()
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Get combined storage statistics
    pub fn stats(&self) -> Result<StorageStats> {
        let db = self.kv.database().stats()?;
        let file_size = std::fs::metadata(&self.db_path)
            .map_err(|e| SarthiError::Io {
                source: e,
                context: format!("Failed to get file metadata: {}", self.db_path.display()),
            })?
            .len();

        Ok(StorageStats { db, file_size })
    }
}

/// Combined storage statistics
#[derive(Debug)]
pub struct StorageStats {
    pub db: DbStats,
    pub file_size: u64,
}

impl StorageStats {
    /// Format size as human-readable string
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_idx = 0;

        while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
            size /= 1024.0;
            unit_idx += 1;
        }

        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("data");
        let storage = StorageManager::new(base.clone(), "sarthi.sqlite").unwrap();

        assert!(base.exists());
        assert!(storage.db_path().exists());
        assert_eq!(storage.base_path(), base.as_path());
    }

    #[test]
    fn test_kv_persists_across_managers() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().to_path_buf();

        {
            let storage = StorageManager::new(base.clone(), "sarthi.sqlite").unwrap();
            write_json(storage.kv().as_ref(), "greeting", &"namaste").unwrap();
        }

        let storage = StorageManager::new(base, "sarthi.sqlite").unwrap();
        let value: String = read_json(storage.kv().as_ref(), "greeting").unwrap();
        assert_eq!(value, "namaste");

        let stats = storage.stats().unwrap();
        assert_eq!(stats.db.entry_count, 1);
        assert_eq!(stats.db.total_size_bytes, "\"namaste\"".len() as u64);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(StorageStats::format_size(0), "0.00 B");
        assert_eq!(StorageStats::format_size(1023), "1023.00 B");
        assert_eq!(StorageStats::format_size(1024), "1.00 KB");
        assert_eq!(StorageStats::format_size(1024 * 1024), "1.00 MB");
    }
}
