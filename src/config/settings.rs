//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub store: StoreConfig,
    pub scheduling: SchedulingConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Store and change-feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Change-feed channel capacity; a lagging subscriber beyond this
    /// triggers a full reload.
    pub channel_capacity: usize,
}

/// Scheduling behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulingConfig {
    /// Whether a caller may confirm past a reported conflict.
    pub allow_conflict_override: bool,
    /// Whether non-invited users may request to join appointments.
    pub allow_join_requests: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_files: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub messaging_counters: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("TEAMCAL"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::TeamCalError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                channel_capacity: 256,
            },
            scheduling: SchedulingConfig {
                allow_conflict_override: true,
                allow_join_requests: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/teamcal".to_string(),
                max_files: 5,
            },
            features: FeaturesConfig {
                messaging_counters: true,
            },
        }
    }
}
