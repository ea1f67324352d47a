//! Registered field shapes in creation order.

use std::collections::BTreeMap;

use fieldkit_core::{EditorOptions, GeoPoint, MarkerId, OverlayId, PathId, Result, ShapeId};
use tracing::info;

use crate::ring::VertexRing;
use crate::shape::FieldShape;
use crate::surface::MapSurface;

/// Ordered collection of closed shapes. Ids start at 1 and follow insertion
/// order; shapes are never removed.
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: BTreeMap<ShapeId, FieldShape>,
    next_id: u64,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self {
            shapes: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Registers a closed ring and draws it.
    pub fn add_shape<S: MapSurface>(
        &mut self,
        surface: &mut S,
        ring: VertexRing,
        options: &EditorOptions,
    ) -> Result<ShapeId> {
        let id = ShapeId::new(self.next_id);
        let shape = FieldShape::create(surface, id, ring, options)?;
        info!(
            "Registered {} with {} vertices ({:.4} ha)",
            id,
            shape.ring().len(),
            shape.area_hectares()
        );
        self.shapes.insert(id, shape);
        self.next_id += 1;
        Ok(id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&FieldShape> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut FieldShape> {
        self.shapes.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldShape> {
        self.shapes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.keys().copied()
    }

    /// Every ring's vertices, in registration order.
    pub fn rings(&self) -> Vec<Vec<GeoPoint>> {
        self.shapes.values().map(|s| s.points().to_vec()).collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Summed area of all shapes in hectares.
    pub fn total_area_hectares(&self) -> f64 {
        self.shapes.values().map(FieldShape::area_hectares).sum()
    }

    /// The shape owning a vertex marker or midpoint handle.
    pub fn shape_of_marker(&self, marker: MarkerId) -> Option<ShapeId> {
        self.find(|shape| shape.owns_marker(marker))
    }

    /// The shape owning a distance label.
    pub fn shape_of_overlay(&self, overlay: OverlayId) -> Option<ShapeId> {
        self.find(|shape| shape.owns_overlay(overlay))
    }

    /// The shape drawn as polygon `path`.
    pub fn shape_of_path(&self, path: PathId) -> Option<ShapeId> {
        self.find(|shape| shape.polygon() == path)
    }

    /// Drops every provisional vertex. Returns how many shapes had one.
    pub fn discard_all_pending<S: MapSurface>(&mut self, surface: &mut S) -> usize {
        self.discard_pending_except(surface, None)
    }

    /// Drops the provisional vertex of every shape other than `keep`.
    /// Returns how many shapes had one.
    pub fn discard_pending_except<S: MapSurface>(
        &mut self,
        surface: &mut S,
        keep: Option<ShapeId>,
    ) -> usize {
        let mut discarded = 0;
        for (id, shape) in self.shapes.iter_mut() {
            if Some(*id) == keep {
                continue;
            }
            if shape.discard_pending(surface) {
                discarded += 1;
            }
        }
        discarded
    }

    /// Removes every shape's visuals from the surface.
    pub fn dispose_all<S: MapSurface>(&mut self, surface: &mut S) {
        for (_, shape) in std::mem::take(&mut self.shapes) {
            shape.dispose(surface);
        }
    }

    fn find(&self, predicate: impl Fn(&FieldShape) -> bool) -> Option<ShapeId> {
        self.shapes
            .values()
            .find(|shape| predicate(shape))
            .map(FieldShape::id)
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn triangle(offset: f64) -> VertexRing {
        VertexRing::from_points(vec![
            GeoPoint::new(offset, 0.0),
            GeoPoint::new(offset, 0.001),
            GeoPoint::new(offset + 0.001, 0.0),
        ])
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut surface = RecordingSurface::new();
        let mut registry = ShapeRegistry::new();
        let options = EditorOptions::default();

        let first = registry.add_shape(&mut surface, triangle(0.0), &options).unwrap();
        let second = registry.add_shape(&mut surface, triangle(1.0), &options).unwrap();
        assert_eq!(first, ShapeId::new(1));
        assert_eq!(second, ShapeId::new(2));
        assert_eq!(registry.rings()[1][0], GeoPoint::new(1.0, 0.0));
    }

    #[test]
    fn test_rejected_ring_does_not_consume_id() {
        let mut surface = RecordingSurface::new();
        let mut registry = ShapeRegistry::new();
        let options = EditorOptions::default();

        assert!(registry
            .add_shape(&mut surface, VertexRing::new(), &options)
            .is_err());
        let id = registry.add_shape(&mut surface, triangle(0.0), &options).unwrap();
        assert_eq!(id, ShapeId::new(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_discard_pending_except_keeps_one_shape() {
        let mut surface = RecordingSurface::new();
        let mut registry = ShapeRegistry::new();
        let options = EditorOptions::default();
        let first = registry.add_shape(&mut surface, triangle(0.0), &options).unwrap();
        let second = registry.add_shape(&mut surface, triangle(1.0), &options).unwrap();
        for id in [first, second] {
            let shape = registry.get_mut(id).unwrap();
            let handle = shape.projection().edge_marker(0).unwrap().handle();
            shape.begin_handle_drag(&mut surface, handle).unwrap();
        }

        assert_eq!(registry.discard_pending_except(&mut surface, Some(second)), 1);
        assert!(registry.get(first).unwrap().pending().is_none());
        assert_eq!(registry.get(first).unwrap().ring().len(), 3);
        assert!(registry.get(second).unwrap().pending().is_some());
        assert_eq!(registry.discard_all_pending(&mut surface), 1);
    }

    #[test]
    fn test_owner_lookup() {
        let mut surface = RecordingSurface::new();
        let mut registry = ShapeRegistry::new();
        let options = EditorOptions::default();
        registry.add_shape(&mut surface, triangle(0.0), &options).unwrap();
        let id = registry.add_shape(&mut surface, triangle(1.0), &options).unwrap();

        let shape = registry.get(id).unwrap();
        let vertex = shape.projection().vertex_marker(2).unwrap();
        let label = shape.projection().edge_marker(1).unwrap().label().id();
        let polygon = shape.polygon();

        assert_eq!(registry.shape_of_marker(vertex), Some(id));
        assert_eq!(registry.shape_of_overlay(label), Some(id));
        assert_eq!(registry.shape_of_path(polygon), Some(id));
        assert_eq!(registry.shape_of_marker(MarkerId::new(9999)), None);
    }
}
