//! Settings Persistence
//!
//! Resolves where the configuration lives and loads or saves it there.
//! The default location is `<config dir>/fieldkit/config.toml`, with the
//! platform config directory resolved by `dirs`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{SettingsError, SettingsResult};

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "fieldkit";

/// File name of the default configuration.
pub const CONFIG_FILE: &str = "config.toml";

/// Settings persistence layer
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    config: Config,
    path: PathBuf,
}

impl SettingsPersistence {
    /// Platform config directory of the application.
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .map(|p| p.join(APP_DIR))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config or home directory".to_string())
            })
    }

    /// Path of the default configuration file.
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// An explicit path must exist. A missing default file yields the default
    /// config.
    pub fn load(path: Option<&Path>) -> SettingsResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load_or_default(&Self::default_config_path()?),
        }
    }

    /// Load settings from file
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let config = Config::load_from_file(path)?;
        debug!("Loaded settings from {}", path.display());
        Ok(Self {
            config,
            path: path.to_path_buf(),
        })
    }

    /// Load settings from file, falling back to defaults when it is absent
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            return Self::load_from_file(path);
        }
        info!("No settings at {}, using defaults", path.display());
        Ok(Self {
            config: Config::default(),
            path: path.to_path_buf(),
        })
    }

    /// Save settings to the file they were loaded from, creating its directory
    pub fn save(&self) -> SettingsResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.config.save_to_file(&self.path)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable reference to config
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
