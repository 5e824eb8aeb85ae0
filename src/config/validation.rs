//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{TeamCalError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_store_config(&settings.store)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

/// Validate store configuration
fn validate_store_config(config: &super::StoreConfig) -> Result<()> {
    if config.channel_capacity == 0 {
        return Err(TeamCalError::Config(
            "Change-feed channel capacity must be greater than 0".to_string()
        ));
    }
    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TeamCalError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(TeamCalError::Config(format!(
            "Invalid log level: {}. Must be one of: {:?}",
            config.level, valid_levels
        )));
    }

    if config.file_path.is_empty() {
        return Err(TeamCalError::Config(
            "Log file path is required".to_string()
        ));
    }

    if config.max_files == 0 {
        return Err(TeamCalError::Config(
            "Max log files must be greater than 0".to_string()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut settings = Settings::default();
        settings.store.channel_capacity = 0;
        assert_matches!(validate_settings(&settings), Err(TeamCalError::Config(_)));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(TeamCalError::Config(_)));
    }
}
