pub mod application_settings;

pub use application_settings::{
    LogFormat, LoggingSettings, NotificationSettings, ReminderSettings, Settings, SettingsError,
    StorageSettings, MAX_CHECK_INTERVAL_MINUTES,
};
