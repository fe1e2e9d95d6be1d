//! Configuration management for Sarthi
//!
//! Loads the TOML configuration, applies `SARTHI_SECTION__KEY` environment
//! overrides and validates the result.

use crate::analytics::DatePreset;
use crate::error::{Result, SarthiError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Schema version written by `config init` and accepted by the validator
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
}

/// Audit log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Identical entries closer together than this are dropped
    pub dedup_window_ms: i64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: crate::audit::DEFAULT_DEDUP_WINDOW_MS,
        }
    }
}

/// Listing page sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: crate::pagination::DEFAULT_PAGE_LIMIT,
            max_limit: 100,
        }
    }
}

/// Dashboard defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub active_user_window_days: i64,
    pub default_preset: DatePreset,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            active_user_window_days: crate::analytics::service::DEFAULT_ACTIVE_WINDOW_DAYS,
            default_preset: DatePreset::AllTime,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SarthiError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SarthiError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Load from `path`, falling back to validated defaults when the file
    /// does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(SarthiError::ConfigNotFound { path }) => {
                tracing::warn!(
                    "No config at {}, using defaults (run `sarthi config init`)",
                    path.display()
                );
                let mut config = Self::default();
                config.apply_env_overrides();
                ConfigValidator::validate(&config)?;
                Ok(config)
            }
            other => other,
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SarthiError::Io {
                source: e,
                context: format!("Failed to create config directory: {:?}", parent),
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| SarthiError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: SARTHI_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    fn apply_overrides(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix("SARTHI_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        fn number<T: std::str::FromStr>(path: &str, value: &str) -> Result<T> {
            value.trim().parse().map_err(|_| SarthiError::InvalidConfigValue {
                path: path.to_string(),
                message: format!("Cannot parse '{}' as a number", value),
            })
        }

        match path {
            "STORAGE__DATA_DIR" => self.storage.data_dir = PathBuf::from(value),
            "STORAGE__DATABASE_FILE" => self.storage.database_file = value.to_string(),
            "AUDIT__DEDUP_WINDOW_MS" => self.audit.dedup_window_ms = number(path, value)?,
            "PAGINATION__DEFAULT_LIMIT" => self.pagination.default_limit = number(path, value)?,
            "PAGINATION__MAX_LIMIT" => self.pagination.max_limit = number(path, value)?,
            "ANALYTICS__ACTIVE_USER_WINDOW_DAYS" => {
                self.analytics.active_user_window_days = number(path, value)?
            }
            "ANALYTICS__DEFAULT_PRESET" => {
                self.analytics.default_preset = value.trim().parse()?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SarthiError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("sarthi").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("~/.sarthi"),
                database_file: "sarthi.db".to_string(),
            },
            audit: AuditConfig::default(),
            pagination: PaginationConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.audit.dedup_window_ms = 2500;
        config.analytics.default_preset = DatePreset::Last30Days;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.audit.dedup_window_ms, 2500);
        assert_eq!(loaded.analytics.default_preset, DatePreset::Last30Days);
        assert_eq!(loaded.storage.database_file, "sarthi.db");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
            [_meta]
            schema_version = "1.0.0"

            [storage]
            data_dir = "/tmp/sarthi"
            database_file = "portal.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.audit.dedup_window_ms, 1000);
        assert_eq!(config.analytics.default_preset, DatePreset::AllTime);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(
            Config::load(&path),
            Err(SarthiError::ConfigNotFound { .. })
        ));
        assert!(Config::load_or_default(&path).is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(vars(&[
            ("SARTHI_AUDIT__DEDUP_WINDOW_MS", "250"),
            ("SARTHI_PAGINATION__DEFAULT_LIMIT", "25"),
            ("SARTHI_ANALYTICS__DEFAULT_PRESET", "6m"),
            ("SARTHI_STORAGE__DATABASE_FILE", "other.db"),
            ("HOME", "/root"),
        ]));

        assert_eq!(config.audit.dedup_window_ms, 250);
        assert_eq!(config.pagination.default_limit, 25);
        assert_eq!(config.analytics.default_preset, DatePreset::Last6Months);
        assert_eq!(config.storage.database_file, "other.db");
    }

    #[test]
    fn test_bad_env_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(vars(&[
            ("SARTHI_PAGINATION__MAX_LIMIT", "lots"),
            ("SARTHI_ANALYTICS__DEFAULT_PRESET", "1y"),
        ]));

        assert_eq!(config.pagination.max_limit, 100);
        assert_eq!(config.analytics.default_preset, DatePreset::AllTime);
    }
}
