//! Scripted replay of editing sessions.
//!
//! A script lists high-level user actions (clicks, drags, typed lengths) with
//! logical references to shapes, vertices and edges. The replay resolves
//! those references to the handles on a [`RecordingSurface`] and feeds the
//! resulting [`SurfaceEvent`]s to a [`FieldEditor`], the same way a map
//! front end would.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use fieldkit_core::{DistanceInput, EditError, EditorOptions, GeoPoint, ShapeId};
use fieldkit_editor::{FieldEditor, RecordingSurface, SurfaceEvent};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

fn default_zoom() -> f64 {
    18.0
}

/// A replay script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub name: Option<String>,
    /// Zoom level of the surface, used for label placement.
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    pub steps: Vec<Step>,
}

/// One user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    StartDrawing,
    CancelDrawing,
    Click {
        lat: f64,
        lng: f64,
    },
    /// Both clicks of a double-click followed by the double-click itself.
    DoubleClick {
        lat: f64,
        lng: f64,
    },
    /// Drags a vertex of `shape`, or of the open drawing when `shape` is absent.
    DragVertex {
        #[serde(default)]
        shape: Option<u64>,
        vertex: usize,
        lat: f64,
        lng: f64,
    },
    DragEdgeHandle {
        shape: u64,
        edge: usize,
        lat: f64,
        lng: f64,
    },
    ClickEdge {
        shape: u64,
        edge: usize,
        lat: f64,
        lng: f64,
    },
    /// Types `value` (e.g. `"0.2 km"`) into an edge's distance label.
    EditDistance {
        #[serde(default)]
        shape: Option<u64>,
        edge: usize,
        value: String,
    },
    SurfaceLost,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::StartDrawing => "start_drawing",
            Step::CancelDrawing => "cancel_drawing",
            Step::Click { .. } => "click",
            Step::DoubleClick { .. } => "double_click",
            Step::DragVertex { .. } => "drag_vertex",
            Step::DragEdgeHandle { .. } => "drag_edge_handle",
            Step::ClickEdge { .. } => "click_edge",
            Step::EditDistance { .. } => "edit_distance",
            Step::SurfaceLost => "surface_lost",
        }
    }
}

/// Why a step had no effect
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("Step refers to {0}, which does not exist")]
    MissingReference(String),

    #[error("{0}")]
    BadInput(String),
}

/// A step that was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub step: usize,
    pub action: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeReport {
    pub id: ShapeId,
    pub vertices: Vec<GeoPoint>,
    pub hectares: f64,
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub script: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub steps: usize,
    pub failures: Vec<StepFailure>,
    pub shapes: Vec<ShapeReport>,
    pub total_hectares: f64,
    pub drawing: bool,
    pub live_markers: usize,
    pub live_labels: usize,
    pub live_paths: usize,
    pub stale_removals: usize,
}

/// Reads a JSON script.
pub fn load_script(path: &Path) -> anyhow::Result<Script> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid script {}", path.display()))
}

/// Replays `script` on a fresh editor.
pub fn run_script(script: &Script, options: EditorOptions) -> ReplayReport {
    let mut editor = FieldEditor::new(RecordingSurface::with_zoom(script.zoom), options);
    let mut failures = Vec::new();

    for (index, step) in script.steps.iter().enumerate() {
        if let Err(e) = apply_step(&mut editor, step) {
            warn!("Step {} ({}) had no effect: {}", index, step.name(), e);
            failures.push(StepFailure {
                step: index,
                action: step.name(),
                error: e.to_string(),
            });
        }
    }

    let report = report(script, &editor, failures);
    info!(
        "Replayed {} steps: {} shapes, {:.4} ha",
        report.steps,
        report.shapes.len(),
        report.total_hectares
    );
    report
}

/// Translates one step into surface events.
pub fn apply_step(
    editor: &mut FieldEditor<RecordingSurface>,
    step: &Step,
) -> Result<(), StepError> {
    match step {
        Step::StartDrawing => editor.start_drawing()?,
        Step::CancelDrawing => {
            editor.cancel_drawing()?;
        }
        Step::Click { lat, lng } => {
            editor.handle_event(SurfaceEvent::Click(GeoPoint::new(*lat, *lng)))?
        }
        Step::DoubleClick { lat, lng } => {
            let position = GeoPoint::new(*lat, *lng);
            // A click repeating the last vertex is absorbed by the session
            for _ in 0..2 {
                match editor.handle_event(SurfaceEvent::Click(position)) {
                    Ok(()) | Err(EditError::DuplicateVertex { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            editor.handle_event(SurfaceEvent::DoubleClick(position))?
        }
        Step::DragVertex {
            shape,
            vertex,
            lat,
            lng,
        } => {
            let marker = match shape {
                Some(id) => shape_ref(editor, *id)?.projection().vertex_marker(*vertex),
                None => editor
                    .drawing_session()
                    .ok_or(EditError::NoActiveSession)?
                    .projection()
                    .vertex_marker(*vertex),
            }
            .ok_or_else(|| StepError::MissingReference(format!("vertex {}", vertex)))?;
            drag(editor, marker, GeoPoint::new(*lat, *lng))?
        }
        Step::DragEdgeHandle {
            shape,
            edge,
            lat,
            lng,
        } => {
            let handle = shape_ref(editor, *shape)?
                .projection()
                .edge_marker(*edge)
                .map(|e| e.handle())
                .ok_or_else(|| StepError::MissingReference(format!("edge {}", edge)))?;
            drag(editor, handle, GeoPoint::new(*lat, *lng))?
        }
        Step::ClickEdge {
            shape,
            edge,
            lat,
            lng,
        } => {
            let path = shape_ref(editor, *shape)?.polygon();
            editor.handle_event(SurfaceEvent::EdgeClick {
                path,
                edge: *edge,
                position: GeoPoint::new(*lat, *lng),
            })?
        }
        Step::EditDistance { shape, edge, value } => {
            let input: DistanceInput = value.parse().map_err(StepError::BadInput)?;
            let projection = match shape {
                Some(id) => shape_ref(editor, *id)?.projection(),
                None => editor
                    .drawing_session()
                    .ok_or(EditError::NoActiveSession)?
                    .projection(),
            };
            let overlay = projection
                .edge_marker(*edge)
                .map(|e| e.label().id())
                .ok_or_else(|| StepError::MissingReference(format!("edge {}", edge)))?;
            editor.handle_event(SurfaceEvent::LabelSubmit { overlay, input })?
        }
        Step::SurfaceLost => editor.handle_event(SurfaceEvent::SurfaceLost)?,
    }
    Ok(())
}

fn shape_ref(
    editor: &FieldEditor<RecordingSurface>,
    id: u64,
) -> Result<&fieldkit_editor::FieldShape, StepError> {
    let id = ShapeId::new(id);
    editor
        .shape(id)
        .ok_or_else(|| StepError::MissingReference(id.to_string()))
}

fn drag(
    editor: &mut FieldEditor<RecordingSurface>,
    marker: fieldkit_core::MarkerId,
    position: GeoPoint,
) -> Result<(), EditError> {
    editor.handle_event(SurfaceEvent::MarkerDragStart(marker))?;
    editor.handle_event(SurfaceEvent::MarkerDrag { marker, position })?;
    editor.handle_event(SurfaceEvent::MarkerDragEnd { marker, position })
}

fn report(
    script: &Script,
    editor: &FieldEditor<RecordingSurface>,
    failures: Vec<StepFailure>,
) -> ReplayReport {
    let surface = editor.surface();
    ReplayReport {
        script: script.name.clone(),
        generated_at: Utc::now(),
        steps: script.steps.len(),
        failures,
        shapes: editor
            .registry()
            .iter()
            .map(|shape| ShapeReport {
                id: shape.id(),
                vertices: shape.points().to_vec(),
                hectares: shape.area_hectares(),
            })
            .collect(),
        total_hectares: editor.total_area_hectares(),
        drawing: editor.is_drawing(),
        live_markers: surface.live_markers(),
        live_labels: surface.live_labels(),
        live_paths: surface.live_paths(),
        stale_removals: surface.stale_removals(),
    }
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Replay of {} ({})",
            self.script.as_deref().unwrap_or("unnamed script"),
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            f,
            "  {} steps, {} without effect",
            self.steps,
            self.failures.len()
        )?;
        for failure in &self.failures {
            writeln!(
                f,
                "    step {} {}: {}",
                failure.step, failure.action, failure.error
            )?;
        }
        for shape in &self.shapes {
            writeln!(
                f,
                "  {}: {} vertices, {:.4} ha",
                shape.id,
                shape.vertices.len(),
                shape.hectares
            )?;
        }
        writeln!(f, "  Total: {:.4} ha", self.total_hectares)?;
        if self.drawing {
            writeln!(f, "  A drawing session is still open")?;
        }
        write!(
            f,
            "  Live visuals: {} markers, {} labels, {} paths",
            self.live_markers, self.live_labels, self.live_paths
        )
    }
}
