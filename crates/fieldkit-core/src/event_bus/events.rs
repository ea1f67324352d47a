//! Event type definitions for the event bus.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::ids::ShapeId;

/// Events emitted by the field editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldEvent {
    /// A drawing session was opened
    DrawingStarted,
    /// A drawing session was discarded without registering a shape
    DrawingCancelled {
        /// Vertices that were thrown away.
        discarded_vertices: usize,
    },
    /// A vertex was appended to the ring being drawn
    VertexAdded {
        /// Index of the new vertex.
        index: usize,
        /// Its position.
        position: GeoPoint,
    },
    /// A drawing session closed into a registered shape
    ShapeRegistered {
        /// The new shape.
        shape: ShapeId,
        /// Its vertex count.
        vertices: usize,
    },
    /// A registered shape's ring changed
    ShapeEdited {
        /// The edited shape.
        shape: ShapeId,
        /// Its vertex count after the edit.
        vertices: usize,
    },
    /// The summed area of all registered shapes changed
    TotalAreaChanged {
        /// New total in hectares.
        hectares: f64,
    },
}

impl FieldEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            FieldEvent::DrawingStarted
            | FieldEvent::DrawingCancelled { .. }
            | FieldEvent::VertexAdded { .. } => EventCategory::Drawing,
            FieldEvent::ShapeRegistered { .. } | FieldEvent::ShapeEdited { .. } => {
                EventCategory::Shape
            }
            FieldEvent::TotalAreaChanged { .. } => EventCategory::Area,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            FieldEvent::DrawingStarted => "Drawing started".to_string(),
            FieldEvent::DrawingCancelled { discarded_vertices } => {
                format!("Drawing cancelled ({} vertices discarded)", discarded_vertices)
            }
            FieldEvent::VertexAdded { index, position } => {
                format!("Vertex {} added at {}", index, position)
            }
            FieldEvent::ShapeRegistered { shape, vertices } => {
                format!("{} registered with {} vertices", shape, vertices)
            }
            FieldEvent::ShapeEdited { shape, vertices } => {
                format!("{} edited ({} vertices)", shape, vertices)
            }
            FieldEvent::TotalAreaChanged { hectares } => {
                format!("Total area {:.4} ha", hectares)
            }
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Drawing session lifecycle.
    Drawing,
    /// Shape registration and edits.
    Shape,
    /// Aggregate area changes.
    Area,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Drawing => write!(f, "Drawing"),
            EventCategory::Shape => write!(f, "Shape"),
            EventCategory::Area => write!(f, "Area"),
        }
    }
}
