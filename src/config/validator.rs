use crate::analytics::DatePreset;
use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{Result, SarthiError, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, collecting every problem before failing
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_storage(config, &mut errors);
        Self::validate_audit(config, &mut errors);
        Self::validate_pagination(config, &mut errors);
        Self::validate_analytics(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SarthiError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_storage(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.storage.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "storage.data_dir",
                "Data directory cannot be empty",
            ));
        }

        let file = &config.storage.database_file;
        if file.trim().is_empty() {
            errors.push(ValidationError::new(
                "storage.database_file",
                "Database file name cannot be empty",
            ));
        } else if file.contains(['/', '\\']) {
            errors.push(ValidationError::new(
                "storage.database_file",
                format!("Database file must be a bare file name, got '{}'", file),
            ));
        }
    }

    fn validate_audit(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.audit.dedup_window_ms < 0 {
            errors.push(ValidationError::new(
                "audit.dedup_window_ms",
                format!(
                    "Dedup window cannot be negative, got {}",
                    config.audit.dedup_window_ms
                ),
            ));
        }
    }

    fn validate_pagination(config: &Config, errors: &mut Vec<ValidationError>) {
        let pagination = &config.pagination;
        if pagination.default_limit == 0 {
            errors.push(ValidationError::new(
                "pagination.default_limit",
                "Default limit must be greater than 0",
            ));
        }
        if pagination.max_limit < pagination.default_limit {
            errors.push(ValidationError::new(
                "pagination.max_limit",
                format!(
                    "Max limit ({}) must be at least the default limit ({})",
                    pagination.max_limit, pagination.default_limit
                ),
            ));
        }
    }

    fn validate_analytics(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.analytics.active_user_window_days <= 0 {
            errors.push(ValidationError::new(
                "analytics.active_user_window_days",
                "Active user window must be at least one day",
            ));
        }

        // A custom window has no bounds to start from
        if config.analytics.default_preset == DatePreset::Custom {
            errors.push(ValidationError::new(
                "analytics.default_preset",
                "Default preset cannot be 'custom'",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_data_dir() {
        let mut config = Config::default();
        config.storage.data_dir = PathBuf::new();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = Config::default();
        config.meta.schema_version = "0.9.0".to_string();
        config.pagination.default_limit = 0;
        config.audit.dedup_window_ms = -1;
        config.analytics.default_preset = DatePreset::Custom;

        match ConfigValidator::validate(&config) {
            Err(SarthiError::ConfigValidation { errors }) => {
                let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
                assert_eq!(
                    paths,
                    vec![
                        "_meta.schema_version",
                        "audit.dedup_window_ms",
                        "pagination.default_limit",
                        "analytics.default_preset",
                    ]
                );
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_max_below_default() {
        let mut config = Config::default();
        config.pagination.max_limit = 5;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_database_file_must_be_bare_name() {
        let mut config = Config::default();
        config.storage.database_file = "../escape.db".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
