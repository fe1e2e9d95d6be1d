use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sarthi
#[derive(Error, Debug)]
pub enum SarthiError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Connection pool errors
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// Filter key outside the known set
    #[error("Unknown filter key: {0}")]
    UnknownFilterKey(String),

    /// Filter value that cannot be interpreted for its key
    #[error("Invalid value for filter {key}: {value}")]
    InvalidFilterValue { key: String, value: String },

    /// Custom date range whose start is after its end
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    /// Record lookup failure
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Application/user workflow rule violation
    #[error("{0}")]
    Workflow(String),

    /// Caller lacks the permission for an admin action
    #[error("Role {role} is not permitted to {action}")]
    PermissionDenied { role: String, action: String },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for Sarthi operations
pub type Result<T> = std::result::Result<T, SarthiError>;
