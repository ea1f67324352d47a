//! The drawing session: an open ring being sketched click by click.
//!
//! A session owns everything it puts on the surface (vertex markers, edge
//! labels and the trailing polyline). Closing hands the ring over and
//! disposes the visuals; cancelling just disposes them.

use fieldkit_core::{EditError, EditorOptions, GeoPoint, MarkerId, OverlayId, PathId, PathStyle, Result};
use tracing::debug;

use crate::edge_editor;
use crate::projection::{MarkerProjection, ProjectionStyle};
use crate::ring::VertexRing;
use crate::surface::MapSurface;

/// An open ring under construction
#[derive(Debug, Clone)]
pub struct DrawingSession {
    ring: VertexRing,
    projection: MarkerProjection,
    trail: Option<PathId>,
    trail_style: PathStyle,
}

impl DrawingSession {
    /// Opens an empty session. Nothing is drawn until the first click.
    pub fn start(options: &EditorOptions) -> Self {
        Self {
            ring: VertexRing::new(),
            projection: MarkerProjection::new(false, ProjectionStyle::drawing(options)),
            trail: None,
            trail_style: options.drawing_path.clone(),
        }
    }

    /// Appends a clicked vertex. Returns its index.
    ///
    /// A click on exactly the last vertex is the first half of a double-click
    /// and fails with [`EditError::DuplicateVertex`].
    pub fn add_vertex<S: MapSurface>(&mut self, surface: &mut S, position: GeoPoint) -> Result<usize> {
        if self.ring.last() == Some(position) {
            return Err(EditError::DuplicateVertex {
                index: self.ring.len() - 1,
            });
        }

        let index = self.ring.len();
        self.ring.append(position);
        self.projection
            .sync_after_insert(surface, &self.ring, index)?;
        self.redraw_trail(surface);
        debug!("Drawing vertex {} at {}", index, position);
        Ok(index)
    }

    /// Moves a vertex of the open ring.
    pub fn move_vertex<S: MapSurface>(
        &mut self,
        surface: &mut S,
        index: usize,
        position: GeoPoint,
    ) -> Result<()> {
        edge_editor::move_vertex(surface, &mut self.ring, &mut self.projection, index, position)?;
        self.redraw_trail(surface);
        Ok(())
    }

    /// Rescales an open edge. Returns the index of the moved vertex.
    pub fn set_edge_length<S: MapSurface>(
        &mut self,
        surface: &mut S,
        edge: usize,
        desired_m: f64,
        refinements: u8,
    ) -> Result<usize> {
        let index = edge_editor::set_edge_length(
            surface,
            &mut self.ring,
            &mut self.projection,
            edge,
            desired_m,
            refinements,
        )?;
        self.redraw_trail(surface);
        Ok(index)
    }

    /// Fails with [`EditError::PrematureClose`] below three vertices.
    pub fn check_close(&self) -> Result<()> {
        if self.ring.can_close() {
            Ok(())
        } else {
            Err(EditError::PrematureClose {
                vertices: self.ring.len(),
            })
        }
    }

    /// Ends the session, disposing its visuals and handing over the ring.
    pub fn finish<S: MapSurface>(mut self, surface: &mut S) -> VertexRing {
        self.dispose(surface);
        self.ring
    }

    /// Ends the session without a shape. Returns the discarded vertex count.
    pub fn cancel<S: MapSurface>(mut self, surface: &mut S) -> usize {
        self.dispose(surface);
        self.ring.len()
    }

    /// Whether `marker` is the first vertex of the ring.
    pub fn is_first_vertex(&self, marker: MarkerId) -> bool {
        self.projection.vertex_of(marker) == Some(0)
    }

    pub fn vertex_of(&self, marker: MarkerId) -> Option<usize> {
        self.projection.vertex_of(marker)
    }

    /// Whether `marker` is any marker of this session.
    pub fn owns_marker(&self, marker: MarkerId) -> bool {
        self.projection.vertex_of(marker).is_some() || self.projection.edge_of_handle(marker).is_some()
    }

    pub fn edge_of_label(&self, overlay: OverlayId) -> Option<usize> {
        self.projection.edge_of_label(overlay)
    }

    pub fn ring(&self) -> &VertexRing {
        &self.ring
    }

    pub fn projection(&self) -> &MarkerProjection {
        &self.projection
    }

    pub fn trail(&self) -> Option<PathId> {
        self.trail
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    fn redraw_trail<S: MapSurface>(&mut self, surface: &mut S) {
        match self.trail {
            Some(trail) => surface.update_path(trail, self.ring.points()),
            None if self.ring.len() >= 2 => {
                self.trail = Some(surface.create_polyline(self.ring.points(), &self.trail_style));
            }
            None => {}
        }
    }

    fn dispose<S: MapSurface>(&mut self, surface: &mut S) {
        self.projection.dispose(surface);
        if let Some(trail) = self.trail.take() {
            surface.remove_path(trail);
        }
    }
}
