//! Distance label of one edge.

use fieldkit_core::geo;
use fieldkit_core::{format_distance, DistanceInput, GeoPoint, OverlayId};

use crate::surface::{LabelSpec, MapSurface, ScreenPoint};

/// A label showing an edge's length, placed horizontally above the edge
/// midpoint in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceOverlay {
    id: OverlayId,
    anchor: GeoPoint,
    length_m: f64,
}

impl DistanceOverlay {
    /// Creates the label for the edge `a → b`.
    pub fn create<S: MapSurface>(surface: &mut S, a: GeoPoint, b: GeoPoint, offset_px: f64) -> Self {
        let anchor = geo::midpoint(a, b);
        let length_m = geo::distance(a, b);
        let spec = LabelSpec {
            anchor,
            screen: placement(surface, anchor, offset_px),
            text: format_distance(length_m),
            input: DistanceInput::from_meters(length_m),
        };
        let id = surface.create_overlay_label(&spec);
        Self {
            id,
            anchor,
            length_m,
        }
    }

    /// Follows the edge after one of its endpoints moved.
    pub fn update<S: MapSurface>(&mut self, surface: &mut S, a: GeoPoint, b: GeoPoint, offset_px: f64) {
        self.anchor = geo::midpoint(a, b);
        self.length_m = geo::distance(a, b);
        surface.set_overlay_text(
            self.id,
            &format_distance(self.length_m),
            DistanceInput::from_meters(self.length_m),
        );
        surface.reposition_overlay(self.id, self.anchor, placement(surface, self.anchor, offset_px));
    }

    pub fn remove<S: MapSurface>(self, surface: &mut S) {
        surface.remove_overlay(self.id);
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn anchor(&self) -> GeoPoint {
        self.anchor
    }

    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    pub fn text(&self) -> String {
        format_distance(self.length_m)
    }
}

fn placement<S: MapSurface>(surface: &S, anchor: GeoPoint, offset_px: f64) -> ScreenPoint {
    let projected = surface.project_to_screen(anchor);
    ScreenPoint::new(projected.x, projected.y - offset_px)
}
