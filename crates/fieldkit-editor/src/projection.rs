//! Marker projection of a vertex ring onto the map surface.
//!
//! `MarkerProjection` keeps one vertex marker per ring entry and one edge
//! marker (midpoint handle plus distance label) per edge. It holds explicit
//! side tables in both directions:
//!
//! - ring index → vertex `MarkerId`, and `MarkerId` → ring index
//! - edge index → [`EdgeMarker`], plus handle `MarkerId` and `OverlayId` → edge index
//!
//! The ring is the only source of coordinates. Structural changes (insert,
//! remove) shift the vertex tables and rebuild every edge marker; coordinate
//! changes touch one vertex marker and at most two edge markers.

use std::collections::HashMap;

use fieldkit_core::geo;
use fieldkit_core::{EditError, EditorOptions, GeoPoint, MarkerId, MarkerStyle, OverlayId, Result};

use crate::overlay::DistanceOverlay;
use crate::ring::VertexRing;
use crate::surface::MapSurface;

/// Midpoint handle and distance label of one edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMarker {
    handle: MarkerId,
    label: DistanceOverlay,
    midpoint: GeoPoint,
}

impl EdgeMarker {
    pub fn handle(&self) -> MarkerId {
        self.handle
    }

    pub fn label(&self) -> &DistanceOverlay {
        &self.label
    }

    pub fn midpoint(&self) -> GeoPoint {
        self.midpoint
    }
}

/// Marker styles used by one projection
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionStyle {
    pub vertex: MarkerStyle,
    pub handle: MarkerStyle,
    pub label_offset_px: f64,
}

impl ProjectionStyle {
    /// Styles for a ring that is still being drawn.
    pub fn drawing(options: &EditorOptions) -> Self {
        Self {
            vertex: options.drawing_vertex.clone(),
            handle: options.edge_handle.clone(),
            label_offset_px: options.label_offset_px,
        }
    }

    /// Styles for a closed shape.
    pub fn editing(options: &EditorOptions) -> Self {
        Self {
            vertex: options.editing_vertex.clone(),
            handle: options.edge_handle.clone(),
            label_offset_px: options.label_offset_px,
        }
    }
}

/// Visual markers of one ring
#[derive(Debug, Clone)]
pub struct MarkerProjection {
    closed: bool,
    style: ProjectionStyle,
    vertex_markers: Vec<MarkerId>,
    vertex_lookup: HashMap<MarkerId, usize>,
    edge_markers: Vec<EdgeMarker>,
    handle_lookup: HashMap<MarkerId, usize>,
    label_lookup: HashMap<OverlayId, usize>,
}

impl MarkerProjection {
    /// Creates an empty projection. Call [`MarkerProjection::build`] to
    /// populate it from an existing ring.
    pub fn new(closed: bool, style: ProjectionStyle) -> Self {
        Self {
            closed,
            style,
            vertex_markers: Vec::new(),
            vertex_lookup: HashMap::new(),
            edge_markers: Vec::new(),
            handle_lookup: HashMap::new(),
            label_lookup: HashMap::new(),
        }
    }

    /// Replaces every marker with fresh ones for `ring`.
    pub fn build<S: MapSurface>(&mut self, surface: &mut S, ring: &VertexRing) {
        self.dispose(surface);
        for (index, point) in ring.points().iter().enumerate() {
            let marker = surface.create_marker(*point, &self.style.vertex, true);
            self.vertex_markers.push(marker);
            self.vertex_lookup.insert(marker, index);
        }
        self.rebuild_edges(surface, ring);
    }

    /// A vertex was inserted into the ring at `index`.
    pub fn sync_after_insert<S: MapSurface>(
        &mut self,
        surface: &mut S,
        ring: &VertexRing,
        index: usize,
    ) -> Result<()> {
        if index > self.vertex_markers.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.vertex_markers.len(),
            });
        }
        let position = ring.at(index)?;

        let marker = surface.create_marker(position, &self.style.vertex, true);
        self.vertex_markers.insert(index, marker);
        self.reindex_vertices_from(index);
        self.rebuild_edges(surface, ring);
        Ok(())
    }

    /// The vertex at `index` was removed from the ring.
    pub fn sync_after_remove<S: MapSurface>(
        &mut self,
        surface: &mut S,
        ring: &VertexRing,
        index: usize,
    ) -> Result<()> {
        if index >= self.vertex_markers.len() {
            return Err(EditError::IndexOutOfRange {
                index,
                len: self.vertex_markers.len(),
            });
        }

        let marker = self.vertex_markers.remove(index);
        self.vertex_lookup.remove(&marker);
        surface.remove_marker(marker);
        self.reindex_vertices_from(index);
        self.rebuild_edges(surface, ring);
        Ok(())
    }

    /// The vertex at `index` changed position. Touches the vertex marker and
    /// the edge markers on either side of it only.
    pub fn sync_after_move<S: MapSurface>(
        &mut self,
        surface: &mut S,
        ring: &VertexRing,
        index: usize,
    ) -> Result<()> {
        let position = ring.at(index)?;
        let marker = *self
            .vertex_markers
            .get(index)
            .ok_or(EditError::IndexOutOfRange {
                index,
                len: self.vertex_markers.len(),
            })?;
        surface.move_marker(marker, position);

        for edge in self.adjacent_edges(ring.len(), index).into_iter().flatten() {
            self.refresh_edge(surface, ring, edge)?;
        }
        Ok(())
    }

    /// Moves the handle and label of `edge` to match the ring.
    pub fn refresh_edge<S: MapSurface>(
        &mut self,
        surface: &mut S,
        ring: &VertexRing,
        edge: usize,
    ) -> Result<()> {
        let (a, b) = ring.edge(edge, self.closed)?;
        let offset = self.style.label_offset_px;
        let count = self.edge_markers.len();
        let marker = self
            .edge_markers
            .get_mut(edge)
            .ok_or(EditError::IndexOutOfRange { index: edge, len: count })?;

        marker.midpoint = geo::midpoint(a, b);
        surface.move_marker(marker.handle, marker.midpoint);
        marker.label.update(surface, a, b, offset);
        Ok(())
    }

    /// Updates only the label of `edge` to describe the segment `a → b`,
    /// leaving its handle where the surface put it.
    pub fn relabel_edge<S: MapSurface>(
        &mut self,
        surface: &mut S,
        edge: usize,
        a: GeoPoint,
        b: GeoPoint,
    ) -> Result<()> {
        let offset = self.style.label_offset_px;
        let count = self.edge_markers.len();
        let marker = self
            .edge_markers
            .get_mut(edge)
            .ok_or(EditError::IndexOutOfRange { index: edge, len: count })?;
        marker.label.update(surface, a, b, offset);
        Ok(())
    }

    /// Disposes and recreates every edge marker.
    pub fn rebuild_edges<S: MapSurface>(&mut self, surface: &mut S, ring: &VertexRing) {
        self.dispose_edges(surface);

        let offset = self.style.label_offset_px;
        for edge in 0..ring.edge_count(self.closed) {
            let Ok((a, b)) = ring.edge(edge, self.closed) else {
                continue;
            };
            let midpoint = geo::midpoint(a, b);
            let handle = surface.create_marker(midpoint, &self.style.handle, self.closed);
            let label = DistanceOverlay::create(surface, a, b, offset);

            self.handle_lookup.insert(handle, edge);
            self.label_lookup.insert(label.id(), edge);
            self.edge_markers.push(EdgeMarker {
                handle,
                label,
                midpoint,
            });
        }
    }

    /// Removes every marker and label this projection created.
    pub fn dispose<S: MapSurface>(&mut self, surface: &mut S) {
        for marker in self.vertex_markers.drain(..) {
            surface.remove_marker(marker);
        }
        self.vertex_lookup.clear();
        self.dispose_edges(surface);
    }

    fn dispose_edges<S: MapSurface>(&mut self, surface: &mut S) {
        for edge in self.edge_markers.drain(..) {
            surface.remove_marker(edge.handle);
            edge.label.remove(surface);
        }
        self.handle_lookup.clear();
        self.label_lookup.clear();
    }

    fn reindex_vertices_from(&mut self, start: usize) {
        for (index, marker) in self.vertex_markers.iter().enumerate().skip(start) {
            self.vertex_lookup.insert(*marker, index);
        }
    }

    /// Edges that end or start at vertex `index` of a ring of `len` vertices.
    fn adjacent_edges(&self, len: usize, index: usize) -> [Option<usize>; 2] {
        let edges = self.edge_markers.len();
        let valid = |edge: usize| (edge < edges).then_some(edge);
        if self.closed {
            if len < 3 {
                return [None, None];
            }
            let before = (index + len - 1) % len;
            [valid(before), valid(index)]
        } else {
            let before = index.checked_sub(1).and_then(valid);
            let after = if index + 1 < len { valid(index) } else { None };
            [before, after]
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn style(&self) -> &ProjectionStyle {
        &self.style
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_markers.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_markers.len()
    }

    pub fn vertex_markers(&self) -> &[MarkerId] {
        &self.vertex_markers
    }

    pub fn edge_markers(&self) -> &[EdgeMarker] {
        &self.edge_markers
    }

    pub fn vertex_marker(&self, index: usize) -> Option<MarkerId> {
        self.vertex_markers.get(index).copied()
    }

    pub fn edge_marker(&self, edge: usize) -> Option<&EdgeMarker> {
        self.edge_markers.get(edge)
    }

    /// Ring index of a vertex marker.
    pub fn vertex_of(&self, marker: MarkerId) -> Option<usize> {
        self.vertex_lookup.get(&marker).copied()
    }

    /// Edge index of a midpoint handle.
    pub fn edge_of_handle(&self, marker: MarkerId) -> Option<usize> {
        self.handle_lookup.get(&marker).copied()
    }

    /// Edge index of a distance label.
    pub fn edge_of_label(&self, overlay: OverlayId) -> Option<usize> {
        self.label_lookup.get(&overlay).copied()
    }

    /// Whether counts and side tables agree with `ring`.
    pub fn is_consistent_with(&self, ring: &VertexRing) -> bool {
        self.vertex_markers.len() == ring.len()
            && self.edge_markers.len() == ring.edge_count(self.closed)
            && self.vertex_lookup.len() == self.vertex_markers.len()
            && self
                .vertex_markers
                .iter()
                .enumerate()
                .all(|(index, marker)| self.vertex_lookup.get(marker) == Some(&index))
            && self
                .edge_markers
                .iter()
                .enumerate()
                .all(|(edge, marker)| {
                    self.handle_lookup.get(&marker.handle) == Some(&edge)
                        && self.label_lookup.get(&marker.label.id()) == Some(&edge)
                })
    }
}
