//! Headless map surface that records what is on screen.
//!
//! Used by the replay host and by tests to observe the visuals the editor
//! keeps alive. Removing a handle that is not live is counted rather than
//! ignored, so disposal bugs show up as a non-zero [`RecordingSurface::stale_removals`].

use std::collections::BTreeMap;
use std::f64::consts::PI;

use fieldkit_core::{DistanceInput, GeoPoint, MarkerId, MarkerStyle, OverlayId, PathId, PathStyle};
use serde::Serialize;

use super::{LabelSpec, MapSurface, ScreenPoint};

/// Tile size of the Web Mercator pixel grid at zoom 0.
const TILE_SIZE: f64 = 256.0;

/// Latitude clamp of the Mercator projection, as a sine.
const MAX_SIN_LAT: f64 = 0.9999;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedMarker {
    pub position: GeoPoint,
    pub style: MarkerStyle,
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedLabel {
    pub anchor: GeoPoint,
    pub screen: ScreenPoint,
    pub text: String,
    pub input: DistanceInput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedPath {
    pub points: Vec<GeoPoint>,
    pub style: PathStyle,
    pub closed: bool,
}

/// In-memory [`MapSurface`]
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    zoom: f64,
    next_handle: u64,
    markers: BTreeMap<MarkerId, RecordedMarker>,
    labels: BTreeMap<OverlayId, RecordedLabel>,
    paths: BTreeMap<PathId, RecordedPath>,
    stale_removals: usize,
    stale_updates: usize,
}

impl RecordingSurface {
    /// Creates an empty surface projecting at zoom level 18.
    pub fn new() -> Self {
        Self::with_zoom(18.0)
    }

    pub fn with_zoom(zoom: f64) -> Self {
        Self {
            zoom,
            next_handle: 1,
            markers: BTreeMap::new(),
            labels: BTreeMap::new(),
            paths: BTreeMap::new(),
            stale_removals: 0,
            stale_updates: 0,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn marker(&self, id: MarkerId) -> Option<&RecordedMarker> {
        self.markers.get(&id)
    }

    pub fn label(&self, id: OverlayId) -> Option<&RecordedLabel> {
        self.labels.get(&id)
    }

    pub fn path(&self, id: PathId) -> Option<&RecordedPath> {
        self.paths.get(&id)
    }

    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &RecordedMarker)> {
        self.markers.iter().map(|(id, m)| (*id, m))
    }

    pub fn labels(&self) -> impl Iterator<Item = (OverlayId, &RecordedLabel)> {
        self.labels.iter().map(|(id, l)| (*id, l))
    }

    pub fn paths(&self) -> impl Iterator<Item = (PathId, &RecordedPath)> {
        self.paths.iter().map(|(id, p)| (*id, p))
    }

    pub fn live_markers(&self) -> usize {
        self.markers.len()
    }

    pub fn live_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn live_paths(&self) -> usize {
        self.paths.len()
    }

    /// Total visuals currently on the surface.
    pub fn live_visuals(&self) -> usize {
        self.markers.len() + self.labels.len() + self.paths.len()
    }

    /// Removals of handles that were not live.
    pub fn stale_removals(&self) -> usize {
        self.stale_removals
    }

    /// Updates addressed to handles that were not live.
    pub fn stale_updates(&self) -> usize {
        self.stale_updates
    }

    fn next(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn stale_update(&mut self, what: &str, id: u64) {
        tracing::warn!("Update of unknown {} {}", what, id);
        self.stale_updates += 1;
    }

    fn stale_removal(&mut self, what: &str, id: u64) {
        tracing::warn!("Removal of unknown {} {}", what, id);
        self.stale_removals += 1;
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSurface for RecordingSurface {
    fn create_marker(
        &mut self,
        position: GeoPoint,
        style: &MarkerStyle,
        draggable: bool,
    ) -> MarkerId {
        let id = MarkerId::new(self.next());
        self.markers.insert(
            id,
            RecordedMarker {
                position,
                style: style.clone(),
                draggable,
            },
        );
        id
    }

    fn move_marker(&mut self, marker: MarkerId, position: GeoPoint) {
        match self.markers.get_mut(&marker) {
            Some(recorded) => recorded.position = position,
            None => self.stale_update("marker", marker.raw()),
        }
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        if self.markers.remove(&marker).is_none() {
            self.stale_removal("marker", marker.raw());
        }
    }

    fn create_overlay_label(&mut self, label: &LabelSpec) -> OverlayId {
        let id = OverlayId::new(self.next());
        self.labels.insert(
            id,
            RecordedLabel {
                anchor: label.anchor,
                screen: label.screen,
                text: label.text.clone(),
                input: label.input,
            },
        );
        id
    }

    fn set_overlay_text(&mut self, overlay: OverlayId, text: &str, input: DistanceInput) {
        match self.labels.get_mut(&overlay) {
            Some(recorded) => {
                recorded.text = text.to_string();
                recorded.input = input;
            }
            None => self.stale_update("overlay", overlay.raw()),
        }
    }

    fn reposition_overlay(&mut self, overlay: OverlayId, anchor: GeoPoint, screen: ScreenPoint) {
        match self.labels.get_mut(&overlay) {
            Some(recorded) => {
                recorded.anchor = anchor;
                recorded.screen = screen;
            }
            None => self.stale_update("overlay", overlay.raw()),
        }
    }

    fn remove_overlay(&mut self, overlay: OverlayId) {
        if self.labels.remove(&overlay).is_none() {
            self.stale_removal("overlay", overlay.raw());
        }
    }

    fn create_polyline(&mut self, points: &[GeoPoint], style: &PathStyle) -> PathId {
        let id = PathId::new(self.next());
        self.paths.insert(
            id,
            RecordedPath {
                points: points.to_vec(),
                style: style.clone(),
                closed: false,
            },
        );
        id
    }

    fn create_polygon(&mut self, points: &[GeoPoint], style: &PathStyle) -> PathId {
        let id = PathId::new(self.next());
        self.paths.insert(
            id,
            RecordedPath {
                points: points.to_vec(),
                style: style.clone(),
                closed: true,
            },
        );
        id
    }

    fn update_path(&mut self, path: PathId, points: &[GeoPoint]) {
        match self.paths.get_mut(&path) {
            Some(recorded) => recorded.points = points.to_vec(),
            None => self.stale_update("path", path.raw()),
        }
    }

    fn remove_path(&mut self, path: PathId) {
        if self.paths.remove(&path).is_none() {
            self.stale_removal("path", path.raw());
        }
    }

    /// Web Mercator pixel coordinates of the whole world at the current zoom.
    fn project_to_screen(&self, position: GeoPoint) -> ScreenPoint {
        let world = TILE_SIZE * 2f64.powf(self.zoom);
        let sin_lat = position
            .lat
            .to_radians()
            .sin()
            .clamp(-MAX_SIN_LAT, MAX_SIN_LAT);

        let x = (position.lng + 180.0) / 360.0 * world;
        let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * world;
        ScreenPoint::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldkit_core::EditorOptions;

    #[test]
    fn test_projection_origin_is_world_center() {
        let surface = RecordingSurface::with_zoom(0.0);
        let p = surface.project_to_screen(GeoPoint::new(0.0, 0.0));
        assert!((p.x - 128.0).abs() < 1e-9);
        assert!((p.y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_north_is_up() {
        let surface = RecordingSurface::new();
        let south = surface.project_to_screen(GeoPoint::new(10.0, 0.0));
        let north = surface.project_to_screen(GeoPoint::new(10.001, 0.0));
        assert!(north.y < south.y);
    }

    #[test]
    fn test_stale_removal_is_counted() {
        let options = EditorOptions::default();
        let mut surface = RecordingSurface::new();
        let id = surface.create_marker(GeoPoint::new(0.0, 0.0), &options.editing_vertex, true);
        surface.remove_marker(id);
        assert_eq!(surface.stale_removals(), 0);
        surface.remove_marker(id);
        assert_eq!(surface.stale_removals(), 1);
        assert_eq!(surface.live_visuals(), 0);
    }
}
