//! A closed, registered field boundary.

use fieldkit_core::geo;
use fieldkit_core::{EditError, EditorOptions, GeoPoint, MarkerId, OverlayId, PathId, Result, ShapeId};

use crate::projection::{MarkerProjection, ProjectionStyle};
use crate::ring::VertexRing;
use crate::surface::MapSurface;

/// Square meters per hectare.
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// A vertex inserted by a midpoint-handle drag that has not been committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingVertex {
    /// Edge whose handle is being dragged.
    pub edge: usize,
    /// Ring index of the provisional vertex (`edge + 1`).
    pub index: usize,
    /// The dragged handle.
    pub handle: MarkerId,
}

/// Closed ring with its editing markers and filled polygon
#[derive(Debug, Clone)]
pub struct FieldShape {
    pub(crate) id: ShapeId,
    pub(crate) ring: VertexRing,
    pub(crate) projection: MarkerProjection,
    pub(crate) polygon: PathId,
    pub(crate) pending: Option<PendingVertex>,
}

impl FieldShape {
    /// Puts a closed ring on the surface.
    pub fn create<S: MapSurface>(
        surface: &mut S,
        id: ShapeId,
        ring: VertexRing,
        options: &EditorOptions,
    ) -> Result<Self> {
        if !ring.can_close() {
            return Err(EditError::PrematureClose {
                vertices: ring.len(),
            });
        }

        let polygon = surface.create_polygon(ring.points(), &options.shape_path);
        let mut projection = MarkerProjection::new(true, ProjectionStyle::editing(options));
        projection.build(surface, &ring);

        Ok(Self {
            id,
            ring,
            projection,
            polygon,
            pending: None,
        })
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn ring(&self) -> &VertexRing {
        &self.ring
    }

    pub fn points(&self) -> &[GeoPoint] {
        self.ring.points()
    }

    pub fn projection(&self) -> &MarkerProjection {
        &self.projection
    }

    pub fn polygon(&self) -> PathId {
        self.polygon
    }

    pub fn pending(&self) -> Option<PendingVertex> {
        self.pending
    }

    /// Spherical area in square meters, including a provisional vertex.
    pub fn area_m2(&self) -> f64 {
        self.ring
            .to_closed_path()
            .map(|path| geo::area(&path))
            .unwrap_or(0.0)
    }

    pub fn area_hectares(&self) -> f64 {
        self.area_m2() / SQUARE_METERS_PER_HECTARE
    }

    /// Whether any marker, label or path of this shape is `marker`.
    pub fn owns_marker(&self, marker: MarkerId) -> bool {
        self.projection.vertex_of(marker).is_some()
            || self.projection.edge_of_handle(marker).is_some()
            || self.pending.is_some_and(|p| p.handle == marker)
    }

    pub fn owns_overlay(&self, overlay: OverlayId) -> bool {
        self.projection.edge_of_label(overlay).is_some()
    }

    /// Removes every visual of this shape.
    pub fn dispose<S: MapSurface>(mut self, surface: &mut S) {
        self.pending = None;
        self.projection.dispose(surface);
        surface.remove_path(self.polygon);
    }

    pub(crate) fn redraw<S: MapSurface>(&self, surface: &mut S) {
        surface.update_path(self.polygon, self.ring.points());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn test_create_requires_three_vertices() {
        let mut surface = RecordingSurface::new();
        let ring = VertexRing::from_points(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]);
        let result = FieldShape::create(&mut surface, ShapeId::new(1), ring, &EditorOptions::default());
        assert!(matches!(result, Err(EditError::PrematureClose { vertices: 2 })));
        assert_eq!(surface.live_visuals(), 0);
    }

    #[test]
    fn test_create_and_dispose() {
        let mut surface = RecordingSurface::new();
        let ring = VertexRing::from_points(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.001, 0.0),
        ]);
        let shape = FieldShape::create(&mut surface, ShapeId::new(1), ring, &EditorOptions::default())
            .unwrap();

        let polygon = surface.path(shape.polygon()).unwrap();
        assert!(polygon.closed);
        assert_eq!(polygon.points.len(), 3);
        assert!(shape.area_m2() > 0.0);

        let handle = shape.projection().edge_marker(0).unwrap().handle();
        assert!(surface.marker(handle).unwrap().draggable);

        shape.dispose(&mut surface);
        assert_eq!(surface.live_visuals(), 0);
        assert_eq!(surface.stale_removals(), 0);
    }
}
