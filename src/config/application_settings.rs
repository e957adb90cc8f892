use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Longest accepted reminder check period, one week
pub const MAX_CHECK_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Prefix for environment overrides, e.g. `CLEARPASS__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "CLEARPASS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding one JSON document per storage key
    pub data_dir: PathBuf,
    /// Keep everything in memory; nothing survives the process
    pub ephemeral: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".clearpass"),
            ephemeral: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Text,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `info,clearpass=debug`
    pub level: String,
    pub format: LogFormat,
    pub console: bool,
    /// Daily rolling log file; the file name is used as the prefix
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            console: true,
            file_path: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationSettings {
    pub max_stored: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { max_stored: 50 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReminderSettings {
    /// Minutes between two reminder checks while the scheduler runs
    pub check_interval_minutes: u64,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self { check_interval_minutes: 10 }
    }
}

impl ReminderSettings {
    pub fn check_period(&self) -> Duration {
        Duration::from_secs(self.check_interval_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub notifications: NotificationSettings,
    pub reminders: ReminderSettings,
}

impl Settings {
    /// Loads settings from an optional TOML file, then applies `CLEARPASS__` environment
    /// overrides. Every field has a default, so neither source is required.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.notifications.max_stored == 0 {
            return Err(SettingsError::Invalid(
                "notifications.max_stored must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_CHECK_INTERVAL_MINUTES).contains(&self.reminders.check_interval_minutes) {
            return Err(SettingsError::Invalid(format!(
                "reminders.check_interval_minutes must be between 1 and {}",
                MAX_CHECK_INTERVAL_MINUTES
            )));
        }
        Ok(())
    }
}
