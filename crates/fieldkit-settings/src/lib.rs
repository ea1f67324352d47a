//! FieldKit Settings Crate
//!
//! Handles application configuration, validation, and settings persistence.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, ConfigFormat, LoggingSettings, LOG_LEVELS};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use persistence::SettingsPersistence;
