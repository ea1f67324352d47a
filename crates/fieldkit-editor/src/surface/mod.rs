//! Capability interface of the map surface.
//!
//! The editor never draws anything itself. It asks a [`MapSurface`] to create,
//! move and remove markers, labels and paths, and it receives pointer and
//! input activity back as [`SurfaceEvent`]s carrying the handles the surface
//! handed out.

mod recording;

pub use recording::{RecordedLabel, RecordedMarker, RecordedPath, RecordingSurface};

use fieldkit_core::{DistanceInput, GeoPoint, MarkerId, MarkerStyle, OverlayId, PathId, PathStyle};
use serde::{Deserialize, Serialize};

/// A position in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything the surface needs to draw a distance label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    /// Edge midpoint the label belongs to.
    pub anchor: GeoPoint,
    /// Pixel position of the label's center.
    pub screen: ScreenPoint,
    /// Formatted edge length.
    pub text: String,
    /// Decoded value shown in the numeric input.
    pub input: DistanceInput,
}

/// Rendering services the editor consumes
pub trait MapSurface {
    fn create_marker(&mut self, position: GeoPoint, style: &MarkerStyle, draggable: bool)
        -> MarkerId;

    fn move_marker(&mut self, marker: MarkerId, position: GeoPoint);

    fn remove_marker(&mut self, marker: MarkerId);

    fn create_overlay_label(&mut self, label: &LabelSpec) -> OverlayId;

    fn set_overlay_text(&mut self, overlay: OverlayId, text: &str, input: DistanceInput);

    fn reposition_overlay(&mut self, overlay: OverlayId, anchor: GeoPoint, screen: ScreenPoint);

    fn remove_overlay(&mut self, overlay: OverlayId);

    /// Open path, drawn while a ring is being sketched.
    fn create_polyline(&mut self, points: &[GeoPoint], style: &PathStyle) -> PathId;

    /// Filled polygon; the surface closes `points` implicitly and reports
    /// boundary clicks as [`SurfaceEvent::EdgeClick`].
    fn create_polygon(&mut self, points: &[GeoPoint], style: &PathStyle) -> PathId;

    fn update_path(&mut self, path: PathId, points: &[GeoPoint]);

    fn remove_path(&mut self, path: PathId);

    fn project_to_screen(&self, position: GeoPoint) -> ScreenPoint;
}

/// Pointer and input activity reported by the surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// Click on the map background.
    Click(GeoPoint),
    /// Double-click on the map background; the clicks before it were reported
    /// separately.
    DoubleClick(GeoPoint),
    MarkerClick(MarkerId),
    MarkerDragStart(MarkerId),
    MarkerDrag {
        marker: MarkerId,
        position: GeoPoint,
    },
    MarkerDragEnd {
        marker: MarkerId,
        position: GeoPoint,
    },
    /// A value was submitted in a distance label's input.
    LabelSubmit {
        overlay: OverlayId,
        input: DistanceInput,
    },
    /// Click on a polygon boundary, on edge `edge`.
    EdgeClick {
        path: PathId,
        edge: usize,
        position: GeoPoint,
    },
    /// The surface dropped an interaction midway (pointer capture lost,
    /// window blurred). Pending drags will never see their end event.
    SurfaceLost,
}
