//! # FieldKit Editor
//!
//! Interactive drawing and editing of field boundaries on a map surface.
//!
//! The crate is organised bottom-up:
//!
//! - [`ring`]: the ordered vertex sequence, the only source of coordinates
//! - [`surface`]: the [`MapSurface`] capability interface and the events it reports
//! - [`overlay`] and [`projection`]: the markers and labels derived from a ring
//! - [`session`]: the open ring being drawn
//! - [`shape`], [`edge_editor`] and [`registry`]: closed shapes and their edits
//! - [`editor`]: the [`FieldEditor`] facade a host drives with [`SurfaceEvent`]s
//!
//! ```
//! use fieldkit_core::{EditorOptions, GeoPoint};
//! use fieldkit_editor::{FieldEditor, RecordingSurface, SurfaceEvent};
//!
//! let mut editor = FieldEditor::new(RecordingSurface::new(), EditorOptions::default());
//! editor.start_drawing().unwrap();
//! for (lat, lng) in [(0.0, 0.0), (0.0, 0.001), (0.001, 0.001)] {
//!     editor.handle_event(SurfaceEvent::Click(GeoPoint::new(lat, lng))).unwrap();
//! }
//! editor.handle_event(SurfaceEvent::DoubleClick(GeoPoint::new(0.001, 0.001))).unwrap();
//!
//! assert_eq!(editor.get_shapes().len(), 1);
//! assert!(editor.total_area_hectares() > 0.0);
//! ```

pub mod edge_editor;
pub mod editor;
pub mod overlay;
pub mod projection;
pub mod registry;
pub mod ring;
pub mod session;
pub mod shape;
pub mod surface;

pub use editor::FieldEditor;
pub use overlay::DistanceOverlay;
pub use projection::{EdgeMarker, MarkerProjection, ProjectionStyle};
pub use registry::ShapeRegistry;
pub use ring::{VertexRing, MIN_CLOSED_VERTICES};
pub use session::DrawingSession;
pub use shape::{FieldShape, PendingVertex, SQUARE_METERS_PER_HECTARE};
pub use surface::{
    LabelSpec, MapSurface, RecordedLabel, RecordedMarker, RecordedPath, RecordingSurface,
    ScreenPoint, SurfaceEvent,
};
