//! Host-facing facade tying the drawing session, the shape registry and the
//! event bus to one map surface.
//!
//! The host forwards every [`SurfaceEvent`] to [`FieldEditor::handle_event`].
//! Each event runs to completion: by the time the call returns the ring, its
//! markers and the registered total agree again.

use fieldkit_core::{
    EditError, EditorOptions, EventBus, EventCategory, EventFilter, FieldEvent, GeoPoint, MarkerId,
    OverlayId, PathId, Result, ShapeId, SubscriptionId,
};
use tracing::{debug, error, info};

use crate::registry::ShapeRegistry;
use crate::session::DrawingSession;
use crate::shape::FieldShape;
use crate::surface::{MapSurface, SurfaceEvent};

/// Interactive editor for field boundaries on one map surface
pub struct FieldEditor<S: MapSurface> {
    surface: S,
    options: EditorOptions,
    drawing: Option<DrawingSession>,
    registry: ShapeRegistry,
    events: EventBus,
}

impl<S: MapSurface> FieldEditor<S> {
    pub fn new(surface: S, options: EditorOptions) -> Self {
        Self::with_event_bus(surface, options, EventBus::new())
    }

    pub fn with_event_bus(surface: S, options: EditorOptions, events: EventBus) -> Self {
        Self {
            surface,
            options,
            drawing: None,
            registry: ShapeRegistry::new(),
            events,
        }
    }

    /// Opens a drawing session. Provisional vertices on registered shapes are
    /// discarded first.
    pub fn start_drawing(&mut self) -> Result<()> {
        if self.drawing.is_some() {
            return Err(EditError::SessionActive);
        }

        self.discard_pending_except(None);
        self.drawing = Some(DrawingSession::start(&self.options));
        info!("Drawing started");
        self.events.publish(FieldEvent::DrawingStarted);
        Ok(())
    }

    /// Discards the open session and its visuals. Returns the number of
    /// vertices thrown away.
    pub fn cancel_drawing(&mut self) -> Result<usize> {
        let session = self.drawing.take().ok_or(EditError::NoActiveSession)?;
        let discarded = session.cancel(&mut self.surface);
        info!("Drawing cancelled, {} vertices discarded", discarded);
        self.events.publish(FieldEvent::DrawingCancelled {
            discarded_vertices: discarded,
        });
        Ok(discarded)
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }

    pub fn drawing_session(&self) -> Option<&DrawingSession> {
        self.drawing.as_ref()
    }

    /// Calls `callback` with the new total in hectares whenever it changes.
    pub fn on_total_area_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.events.subscribe(
            EventFilter::Categories(vec![EventCategory::Area]),
            move |event| {
                if let FieldEvent::TotalAreaChanged { hectares } = event {
                    callback(*hectares);
                }
            },
        )
    }

    /// Vertices of every registered shape, in registration order.
    pub fn get_shapes(&self) -> Vec<Vec<GeoPoint>> {
        self.registry.rings()
    }

    pub fn total_area_hectares(&self) -> f64 {
        self.registry.total_area_hectares()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&FieldShape> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Removes every visual the editor created and returns the surface.
    pub fn teardown(mut self) -> S {
        if let Some(session) = self.drawing.take() {
            session.cancel(&mut self.surface);
        }
        self.registry.dispose_all(&mut self.surface);
        debug!("Editor torn down");
        self.surface
    }

    /// Applies one surface event. An error means the edit was not applied.
    pub fn handle_event(&mut self, event: SurfaceEvent) -> Result<()> {
        debug!("Surface event: {:?}", event);
        let result = self.dispatch(event);
        if let Err(e) = &result {
            if e.is_programming_error() {
                error!("Surface event rejected: {}", e);
            } else {
                debug!("Surface event ignored: {}", e);
            }
        }
        result
    }

    fn dispatch(&mut self, event: SurfaceEvent) -> Result<()> {
        match event {
            SurfaceEvent::Click(position) => self.click(position),
            SurfaceEvent::DoubleClick(_) => self.close_drawing().map(|_| ()),
            SurfaceEvent::MarkerClick(marker) => self.marker_click(marker),
            SurfaceEvent::MarkerDragStart(marker) => self.marker_drag_start(marker),
            SurfaceEvent::MarkerDrag { marker, position } => {
                self.marker_drag(marker, position, false)
            }
            SurfaceEvent::MarkerDragEnd { marker, position } => {
                self.marker_drag(marker, position, true)
            }
            SurfaceEvent::LabelSubmit { overlay, input } => {
                self.label_submit(overlay, input.to_meters())
            }
            SurfaceEvent::EdgeClick {
                path,
                edge,
                position,
            } => self.edge_click(path, edge, position),
            SurfaceEvent::SurfaceLost => {
                self.discard_pending_except(None);
                Ok(())
            }
        }
    }

    fn click(&mut self, position: GeoPoint) -> Result<()> {
        if self.drawing.is_none() {
            return Err(EditError::NoActiveSession);
        }
        self.discard_pending_except(None);
        let session = self.drawing.as_mut().ok_or(EditError::NoActiveSession)?;
        let index = session.add_vertex(&mut self.surface, position)?;
        self.events
            .publish(FieldEvent::VertexAdded { index, position });
        Ok(())
    }

    /// Closes the open session into a registered shape.
    fn close_drawing(&mut self) -> Result<ShapeId> {
        let session = self.drawing.as_ref().ok_or(EditError::NoActiveSession)?;
        session.check_close()?;

        let Some(session) = self.drawing.take() else {
            return Err(EditError::NoActiveSession);
        };
        let ring = session.finish(&mut self.surface);
        let vertices = ring.len();
        let id = self.registry.add_shape(&mut self.surface, ring, &self.options)?;
        self.events
            .publish(FieldEvent::ShapeRegistered { shape: id, vertices });
        self.notify_total();
        Ok(id)
    }

    fn marker_click(&mut self, marker: MarkerId) -> Result<()> {
        let (owned, first) = match &self.drawing {
            Some(session) => (session.owns_marker(marker), session.is_first_vertex(marker)),
            None => (false, false),
        };
        if owned {
            if first && self.options.close_on_first_vertex {
                self.close_drawing()?;
            }
            return Ok(());
        }
        match self.registry.shape_of_marker(marker) {
            Some(_) => Ok(()),
            None => Err(unknown_marker(marker)),
        }
    }

    fn marker_drag_start(&mut self, marker: MarkerId) -> Result<()> {
        if let Some(session) = &self.drawing {
            if session.owns_marker(marker) {
                return Ok(());
            }
        }

        let id = self
            .registry
            .shape_of_marker(marker)
            .ok_or_else(|| unknown_marker(marker))?;
        self.discard_pending_except(Some(id));
        let shape = shape_in(&mut self.registry, id)?;
        if shape.projection().edge_of_handle(marker).is_some() {
            shape.begin_handle_drag(&mut self.surface, marker)?;
            self.shape_edited(id);
        }
        Ok(())
    }

    fn marker_drag(&mut self, marker: MarkerId, position: GeoPoint, end: bool) -> Result<()> {
        let drawn = self.drawing.as_ref().and_then(|s| s.vertex_of(marker));
        if let Some(index) = drawn {
            self.discard_pending_except(None);
            let session = self.drawing.as_mut().ok_or(EditError::NoActiveSession)?;
            return session.move_vertex(&mut self.surface, index, position);
        }

        let id = self
            .registry
            .shape_of_marker(marker)
            .ok_or_else(|| unknown_marker(marker))?;
        self.discard_pending_except(Some(id));
        let surface = &mut self.surface;
        let shape = shape_in(&mut self.registry, id)?;

        let handle_drag = shape.pending().is_some_and(|p| p.handle == marker)
            || shape.projection().edge_of_handle(marker).is_some();
        if handle_drag {
            if end {
                shape.end_handle_drag(surface, marker, position)?;
            } else {
                shape.drag_handle(surface, marker, position)?;
            }
        } else {
            let index = shape
                .projection()
                .vertex_of(marker)
                .ok_or_else(|| unknown_marker(marker))?;
            shape.move_vertex(surface, index, position)?;
        }
        self.shape_edited(id);
        Ok(())
    }

    fn label_submit(&mut self, overlay: OverlayId, desired_m: f64) -> Result<()> {
        let refinements = self.options.distance_refinements;
        let drawn = self.drawing.as_ref().and_then(|s| s.edge_of_label(overlay));
        if let Some(edge) = drawn {
            self.discard_pending_except(None);
            let session = self.drawing.as_mut().ok_or(EditError::NoActiveSession)?;
            session.set_edge_length(&mut self.surface, edge, desired_m, refinements)?;
            return Ok(());
        }

        let unknown = EditError::UnknownTarget {
            kind: "overlay",
            id: overlay.raw(),
        };
        let id = self.registry.shape_of_overlay(overlay).ok_or(unknown.clone())?;
        self.discard_pending_except(Some(id));
        let shape = shape_in(&mut self.registry, id)?;
        let edge = shape.projection().edge_of_label(overlay).ok_or(unknown)?;
        shape.set_edge_length(&mut self.surface, edge, desired_m, refinements)?;
        self.shape_edited(id);
        Ok(())
    }

    fn edge_click(&mut self, path: PathId, edge: usize, position: GeoPoint) -> Result<()> {
        let snap_m = self.options.vertex_snap_m;
        let id = self
            .registry
            .shape_of_path(path)
            .ok_or(EditError::UnknownTarget {
                kind: "path",
                id: path.raw(),
            })?;
        self.discard_pending_except(Some(id));
        let shape = shape_in(&mut self.registry, id)?;
        shape.insert_on_edge(&mut self.surface, edge, position, snap_m)?;
        self.shape_edited(id);
        Ok(())
    }

    /// Frees every provisional vertex outside shape `keep` before an edit.
    fn discard_pending_except(&mut self, keep: Option<ShapeId>) {
        let discarded = self.registry.discard_pending_except(&mut self.surface, keep);
        if discarded > 0 {
            debug!("{} provisional vertices discarded before edit", discarded);
            self.notify_total();
        }
    }

    fn shape_edited(&mut self, id: ShapeId) {
        let vertices = self.registry.get(id).map(|s| s.ring().len()).unwrap_or(0);
        self.events
            .publish(FieldEvent::ShapeEdited { shape: id, vertices });
        self.notify_total();
    }

    fn notify_total(&self) {
        let hectares = self.registry.total_area_hectares();
        debug!("Total area {:.4} ha", hectares);
        self.events.publish(FieldEvent::TotalAreaChanged { hectares });
    }
}

fn shape_in(registry: &mut ShapeRegistry, id: ShapeId) -> Result<&mut FieldShape> {
    registry.get_mut(id).ok_or(EditError::UnknownTarget {
        kind: "shape",
        id: id.raw(),
    })
}

fn unknown_marker(marker: MarkerId) -> EditError {
    EditError::UnknownTarget {
        kind: "marker",
        id: marker.raw(),
    }
}
