//! Editing operations on a ring and its markers.
//!
//! The free functions work on any `(ring, projection)` pair, so a drawing
//! session can move vertices and retype edge lengths the same way a closed
//! shape does. Midpoint-handle drags only exist on closed shapes and are
//! implemented on [`FieldShape`].

use fieldkit_core::geo;
use fieldkit_core::{EditError, GeoPoint, MarkerId, Result};
use tracing::{debug, error};

use crate::projection::MarkerProjection;
use crate::ring::VertexRing;
use crate::shape::{FieldShape, PendingVertex};
use crate::surface::MapSurface;

/// Moves vertex `index` to `position`.
pub fn move_vertex<S: MapSurface>(
    surface: &mut S,
    ring: &mut VertexRing,
    projection: &mut MarkerProjection,
    index: usize,
    position: GeoPoint,
) -> Result<()> {
    ring.replace_at(index, position)?;
    projection.sync_after_move(surface, ring, index)
}

/// Rescales edge `edge` to `desired_m` meters by moving its far vertex along
/// the edge direction. Returns the index of the moved vertex.
pub fn set_edge_length<S: MapSurface>(
    surface: &mut S,
    ring: &mut VertexRing,
    projection: &mut MarkerProjection,
    edge: usize,
    desired_m: f64,
    refinements: u8,
) -> Result<usize> {
    let closed = projection.is_closed();
    let (anchor, far) = ring.edge(edge, closed)?;
    let far_index = ring.edge_end(edge, closed)?;

    if geo::distance(anchor, far) <= 0.0 {
        return Err(EditError::DegenerateEdge { edge });
    }
    if !desired_m.is_finite() || desired_m <= 0.0 {
        return Err(EditError::InvalidDistance { value: desired_m });
    }

    let target = geo::reposition_along(anchor, far, desired_m, refinements)
        .ok_or(EditError::DegenerateEdge { edge })?;
    debug!(
        "Edge {} rescaled to {:.3} m, vertex {} moves to {}",
        edge, desired_m, far_index, target
    );
    move_vertex(surface, ring, projection, far_index, target)?;
    Ok(far_index)
}

/// Inserts `position` into closed edge `edge`. Returns the new vertex index.
pub fn insert_on_edge<S: MapSurface>(
    surface: &mut S,
    ring: &mut VertexRing,
    projection: &mut MarkerProjection,
    edge: usize,
    position: GeoPoint,
    snap_m: f64,
) -> Result<usize> {
    let (a, b) = ring.edge(edge, true)?;
    if geo::distance(position, a) <= snap_m {
        return Err(EditError::DuplicateVertex { index: edge });
    }
    if geo::distance(position, b) <= snap_m {
        return Err(EditError::DuplicateVertex {
            index: ring.edge_end(edge, true)?,
        });
    }

    let index = edge + 1;
    ring.insert_at(index, position)?;
    projection.sync_after_insert(surface, ring, index)?;
    Ok(index)
}

impl FieldShape {
    /// Starts dragging the midpoint handle `handle`: its midpoint becomes a
    /// provisional vertex after the edge start. Returns the provisional index.
    pub fn begin_handle_drag<S: MapSurface>(
        &mut self,
        surface: &mut S,
        handle: MarkerId,
    ) -> Result<usize> {
        if let Some(pending) = self.pending {
            if pending.handle == handle {
                return Ok(pending.index);
            }
        }

        let edge = self.projection.edge_of_handle(handle).ok_or(EditError::UnknownTarget {
            kind: "handle",
            id: handle.raw(),
        })?;
        self.discard_pending(surface);

        let midpoint = match self.projection.edge_marker(edge) {
            Some(marker) => marker.midpoint(),
            None => {
                let (a, b) = self.ring.edge(edge, true)?;
                geo::midpoint(a, b)
            }
        };
        let index = edge + 1;
        self.ring.insert_at(index, midpoint)?;
        self.pending = Some(PendingVertex {
            edge,
            index,
            handle,
        });
        self.redraw(surface);
        debug!("{} handle drag started on edge {}", self.id, edge);
        Ok(index)
    }

    /// Moves the provisional vertex of the dragged handle. Only the dragged
    /// edge's label and the polygon follow until the drag ends.
    pub fn drag_handle<S: MapSurface>(
        &mut self,
        surface: &mut S,
        handle: MarkerId,
        position: GeoPoint,
    ) -> Result<()> {
        let pending = self.pending_for(surface, handle)?;
        self.ring.replace_at(pending.index, position)?;
        let anchor = self.ring.at(pending.edge)?;
        self.projection
            .relabel_edge(surface, pending.edge, anchor, position)?;
        self.redraw(surface);
        Ok(())
    }

    /// Commits the provisional vertex at `position`. Returns its index.
    pub fn end_handle_drag<S: MapSurface>(
        &mut self,
        surface: &mut S,
        handle: MarkerId,
        position: GeoPoint,
    ) -> Result<usize> {
        let pending = self.pending_for(surface, handle)?;
        self.ring.replace_at(pending.index, position)?;
        self.pending = None;
        self.projection
            .sync_after_insert(surface, &self.ring, pending.index)?;
        self.redraw(surface);
        debug!("{} vertex {} committed at {}", self.id, pending.index, position);
        Ok(pending.index)
    }

    /// Drops the provisional vertex, restoring the ring and the split edge's
    /// handle and label. Handle ids stay valid. Returns whether there was one.
    pub fn discard_pending<S: MapSurface>(&mut self, surface: &mut S) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if let Err(e) = self.ring.remove_at(pending.index) {
            error!("Provisional vertex of {} was lost: {}", self.id, e);
        }
        if let Err(e) = self
            .projection
            .refresh_edge(surface, &self.ring, pending.edge)
        {
            error!("Edge {} of {} could not be restored: {}", pending.edge, self.id, e);
        }
        self.redraw(surface);
        debug!("{} provisional vertex on edge {} discarded", self.id, pending.edge);
        true
    }

    /// Moves vertex `index` to `position`.
    pub fn move_vertex<S: MapSurface>(
        &mut self,
        surface: &mut S,
        index: usize,
        position: GeoPoint,
    ) -> Result<()> {
        self.discard_pending(surface);
        move_vertex(surface, &mut self.ring, &mut self.projection, index, position)?;
        self.redraw(surface);
        Ok(())
    }

    /// Inserts `position` on edge `edge` unless it lies within `snap_m` of
    /// either endpoint.
    ///
    /// `edge` indexes the polygon as drawn. While a handle drag is pending the
    /// polygon shows the provisional vertex, so both halves of the split edge
    /// map back to it and later edges shift down by one.
    pub fn insert_on_edge<S: MapSurface>(
        &mut self,
        surface: &mut S,
        edge: usize,
        position: GeoPoint,
        snap_m: f64,
    ) -> Result<usize> {
        let edge = match self.pending {
            Some(pending) if edge > pending.edge => edge - 1,
            _ => edge,
        };
        self.discard_pending(surface);
        let index = insert_on_edge(
            surface,
            &mut self.ring,
            &mut self.projection,
            edge,
            position,
            snap_m,
        )?;
        self.redraw(surface);
        Ok(index)
    }

    /// Rescales edge `edge` to `desired_m` meters.
    pub fn set_edge_length<S: MapSurface>(
        &mut self,
        surface: &mut S,
        edge: usize,
        desired_m: f64,
        refinements: u8,
    ) -> Result<usize> {
        self.discard_pending(surface);
        let index = set_edge_length(
            surface,
            &mut self.ring,
            &mut self.projection,
            edge,
            desired_m,
            refinements,
        )?;
        self.redraw(surface);
        Ok(index)
    }

    /// The provisional vertex of `handle`, beginning the drag if it has not
    /// been started.
    fn pending_for<S: MapSurface>(
        &mut self,
        surface: &mut S,
        handle: MarkerId,
    ) -> Result<PendingVertex> {
        match self.pending {
            Some(pending) if pending.handle == handle => Ok(pending),
            _ => {
                self.begin_handle_drag(surface, handle)?;
                self.pending.ok_or(EditError::UnknownTarget {
                    kind: "handle",
                    id: handle.raw(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionStyle;
    use crate::surface::RecordingSurface;
    use fieldkit_core::EditorOptions;

    fn open_ring(surface: &mut RecordingSurface) -> (VertexRing, MarkerProjection) {
        let ring = VertexRing::from_points(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.0, 0.003),
        ]);
        let mut projection =
            MarkerProjection::new(false, ProjectionStyle::drawing(&EditorOptions::default()));
        projection.build(surface, &ring);
        (ring, projection)
    }

    #[test]
    fn test_set_edge_length_on_open_ring() {
        let mut surface = RecordingSurface::new();
        let (mut ring, mut projection) = open_ring(&mut surface);

        let moved = set_edge_length(&mut surface, &mut ring, &mut projection, 1, 500.0, 2).unwrap();
        assert_eq!(moved, 2);
        let length = geo::distance(ring.at(1).unwrap(), ring.at(2).unwrap());
        assert!((length - 500.0).abs() < 1e-3);

        // Open rings have no wrap edge
        assert!(matches!(
            set_edge_length(&mut surface, &mut ring, &mut projection, 2, 500.0, 2),
            Err(EditError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_set_edge_length_rejects_bad_input() {
        let mut surface = RecordingSurface::new();
        let (mut ring, mut projection) = open_ring(&mut surface);
        let before = ring.clone();

        for value in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                set_edge_length(&mut surface, &mut ring, &mut projection, 0, value, 2),
                Err(EditError::InvalidDistance { .. })
            ));
        }
        assert_eq!(ring, before);
    }

    #[test]
    fn test_degenerate_edge() {
        let mut surface = RecordingSurface::new();
        let mut ring = VertexRing::from_points(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.001, 0.0),
        ]);
        let mut projection =
            MarkerProjection::new(true, ProjectionStyle::editing(&EditorOptions::default()));
        projection.build(&mut surface, &ring);

        assert_eq!(
            set_edge_length(&mut surface, &mut ring, &mut projection, 0, 10.0, 2),
            Err(EditError::DegenerateEdge { edge: 0 })
        );
    }

    #[test]
    fn test_insert_on_edge_snaps_to_endpoints() {
        let mut surface = RecordingSurface::new();
        let mut ring = VertexRing::from_points(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.001, 0.001),
        ]);
        let mut projection =
            MarkerProjection::new(true, ProjectionStyle::editing(&EditorOptions::default()));
        projection.build(&mut surface, &ring);

        assert_eq!(
            insert_on_edge(&mut surface, &mut ring, &mut projection, 2, GeoPoint::new(0.0, 0.0), 0.5),
            Err(EditError::DuplicateVertex { index: 0 })
        );
        assert_eq!(ring.len(), 3);

        let index = insert_on_edge(
            &mut surface,
            &mut ring,
            &mut projection,
            2,
            GeoPoint::new(0.0005, 0.0005),
            0.5,
        )
        .unwrap();
        assert_eq!(index, 3);
        assert_eq!(ring.len(), 4);
        assert!(projection.is_consistent_with(&ring));
    }
}
