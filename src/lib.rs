//! # FieldKit
//!
//! Interactive drawing and editing of field boundaries on map surfaces.
//!
//! ## Architecture
//!
//! FieldKit is organized as a workspace with multiple crates:
//!
//! 1. **fieldkit-core** - Geo math, units, styles, errors, events
//! 2. **fieldkit-editor** - Vertex rings, marker projection, drawing sessions, edge editing, shape registry
//! 3. **fieldkit-settings** - Configuration files and validation
//! 4. **fieldkit** - Logging setup, scripted replay, and the command-line binary
//!
//! ## Features
//!
//! - **Drawing**: click-by-click polygon sketching with live edge lengths
//! - **Editing**: vertex drags, midpoint-handle insertion, edge clicks, typed edge lengths
//! - **Area**: spherical polygon area per shape and in total, in hectares
//! - **Headless**: a recording map surface for replaying scripted sessions

pub mod replay;

pub use fieldkit_core::{
    EditError, EditorOptions, EventBus, EventCategory, EventFilter, FieldEvent, GeoPoint, Result,
    ShapeId,
};
pub use fieldkit_editor::{FieldEditor, MapSurface, RecordingSurface, SurfaceEvent};
pub use fieldkit_settings::{Config, LoggingSettings, SettingsPersistence};

pub use replay::{load_script, run_script, ReplayReport, Script, Step};

/// Initialize logging. `RUST_LOG` overrides the configured level.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.level.to_ascii_lowercase()))?;

    if settings.json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .json();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
