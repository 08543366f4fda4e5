//! Post-load configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::PlasmaConfig;

/// Validate a loaded configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &PlasmaConfig) -> ConfigResult<()> {
    validate_logging(config)?;
    validate_world(config)?;
    Ok(())
}

fn validate_logging(config: &PlasmaConfig) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    let file = &config.logging.file;
    let valid_rotations = ["daily", "hourly", "never"];
    if !valid_rotations.contains(&file.rotation.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.file.rotation".to_owned(),
            message: format!(
                "unsupported rotation '{}'; expected one of: {}",
                file.rotation,
                valid_rotations.join(", ")
            ),
        });
    }
    if file.enabled && file.directory.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.file.directory".to_owned(),
            message: "must not be empty when file logging is enabled".to_owned(),
        });
    }
    if file.enabled && file.prefix.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.file.prefix".to_owned(),
            message: "must not be empty when file logging is enabled".to_owned(),
        });
    }

    Ok(())
}

fn validate_world(config: &PlasmaConfig) -> ConfigResult<()> {
    if config.world.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "world.name".to_owned(),
            message: "must not be empty".to_owned(),
        });
    }
    if config.world.storage.base_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "world.storage.base_dir".to_owned(),
            message: "must not be empty".to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&PlasmaConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = PlasmaConfig::default();
        config.logging.level = "loud".to_owned();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "logging.level"));
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = PlasmaConfig::default();
        config.logging.format = "xml".to_owned();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_file_rotation() {
        let mut config = PlasmaConfig::default();
        config.logging.file.rotation = "weekly".to_owned();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "logging.file.rotation"));
    }

    #[test]
    fn test_enabled_file_logging_needs_directory() {
        let mut config = PlasmaConfig::default();
        config.logging.file.directory = std::path::PathBuf::new();
        assert!(validate(&config).is_ok());

        config.logging.file.enabled = true;
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "logging.file.directory"));
    }

    #[test]
    fn test_blank_world_name() {
        let mut config = PlasmaConfig::default();
        config.world.name = "   ".to_owned();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "world.name"));
    }

    #[test]
    fn test_empty_base_dir() {
        let mut config = PlasmaConfig::default();
        config.world.storage.base_dir = std::path::PathBuf::new();
        assert!(validate(&config).is_err());
    }
}
