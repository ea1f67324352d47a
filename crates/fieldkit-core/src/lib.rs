//! # FieldKit Core
//!
//! Core types and utilities shared by the FieldKit crates.
//! Provides geodesic math on GeoPoints, distance units and label formatting,
//! visual styles and editor options, handle identifiers, the error taxonomy,
//! and the event bus.

pub mod error;
pub mod event_bus;
pub mod geo;
pub mod ids;
pub mod options;
pub mod units;

pub use error::{EditError, Result};

pub use event_bus::{
    EventBus, EventBusConfig, EventCategory, EventFilter, FieldEvent, SubscriptionId,
};

pub use geo::{GeoPoint, EARTH_RADIUS_M};

pub use ids::{MarkerId, OverlayId, PathId, ShapeId};

pub use options::{Color, EditorOptions, MarkerKind, MarkerStyle, PathStyle};

pub use units::{format_distance, DistanceInput, LengthUnit};
