//! Configuration for FieldKit
//!
//! Supports JSON and TOML files, chosen by extension. Configuration is
//! organized into two sections:
//! - Logging (level filter, output format)
//! - Editor options (marker and path styles, snapping, label placement)
//!
//! Every field has a default, so a file only needs the keys it changes.

use fieldkit_core::{EditorOptions, MarkerStyle, PathStyle};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult, SettingsResult};

/// Log levels accepted by the `level` setting.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level filter; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format of `path`, by extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingSettings,
    /// Field editor options
    pub editor: EditorOptions,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config content in the given format
    pub fn parse(content: &str, format: ConfigFormat) -> SettingsResult<Self> {
        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Render config in the given format
    pub fn render(&self, format: ConfigFormat) -> SettingsResult<String> {
        self.validate()?;
        Ok(match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        let format = ConfigFormat::from_path(path)?;
        let content = self.render(format)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::UnknownLogLevel(self.logging.level.clone()));
        }

        let editor = &self.editor;
        validate_marker("editor.drawing_vertex", &editor.drawing_vertex)?;
        validate_marker("editor.editing_vertex", &editor.editing_vertex)?;
        validate_marker("editor.edge_handle", &editor.edge_handle)?;
        validate_path("editor.drawing_path", &editor.drawing_path)?;
        validate_path("editor.shape_path", &editor.shape_path)?;

        if !editor.label_offset_px.is_finite() {
            return Err(out_of_range("editor.label_offset_px", editor.label_offset_px));
        }
        if !editor.vertex_snap_m.is_finite() || editor.vertex_snap_m < 0.0 {
            return Err(out_of_range("editor.vertex_snap_m", editor.vertex_snap_m));
        }

        Ok(())
    }
}

fn validate_marker(key: &str, style: &MarkerStyle) -> ConfigResult<()> {
    if !positive(style.radius_px) {
        return Err(out_of_range(&format!("{key}.radius_px"), style.radius_px));
    }
    if !positive(style.stroke_width_px) {
        return Err(out_of_range(
            &format!("{key}.stroke_width_px"),
            style.stroke_width_px,
        ));
    }
    Ok(())
}

fn validate_path(key: &str, style: &PathStyle) -> ConfigResult<()> {
    if !positive(style.stroke_width_px) {
        return Err(out_of_range(
            &format!("{key}.stroke_width_px"),
            style.stroke_width_px,
        ));
    }
    if !(0.0..=1.0).contains(&style.fill_opacity) {
        return Err(out_of_range(&format!("{key}.fill_opacity"), style.fill_opacity));
    }
    Ok(())
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/config.toml")),
            Ok(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Ok(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yaml")),
            Err(ConfigError::UnsupportedFormat("yaml".to_string()))
        );
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = Config::parse(
            "[logging]\nlevel = \"debug\"\n\n[editor]\nvertex_snap_m = 1.5\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
        assert_eq!(config.editor.vertex_snap_m, 1.5);
        assert_eq!(config.editor.label_offset_px, 14.0);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnknownLogLevel("loud".to_string()))
        );

        let mut config = Config::default();
        config.editor.vertex_snap_m = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "editor.vertex_snap_m"
        ));

        let mut config = Config::default();
        config.editor.shape_path.fill_opacity = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.editor.edge_handle.radius_px = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "editor.edge_handle.radius_px"
        ));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = Config::default();
        config.logging.level = "WARN".to_string();
        assert!(config.validate().is_ok());
    }
}
