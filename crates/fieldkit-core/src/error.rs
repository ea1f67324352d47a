//! Error handling for FieldKit
//!
//! Every editing operation reports failure through [`EditError`]. An error
//! always means that the operation changed nothing: the ring, its markers and
//! the registry are left exactly as they were, so the editing surface stays
//! interactive after any malformed input.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Editing error type
///
/// Most variants describe user input that is absorbed (a double-click that
/// comes too early, a zero-length edge). [`EditError::IndexOutOfRange`] is the
/// exception: it points at broken event wiring in the host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// A ring index was outside the valid range
    #[error("Index {index} out of range for ring of length {len}")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// The ring length at the time of the call.
        len: usize,
    },

    /// A distance edit targeted an edge whose endpoints coincide
    #[error("Edge {edge} has zero length and cannot be rescaled")]
    DegenerateEdge {
        /// The edge index.
        edge: usize,
    },

    /// A close was requested before the ring had three vertices
    #[error("Cannot close a ring with {vertices} vertices (need at least 3)")]
    PrematureClose {
        /// The vertex count at the time of the request.
        vertices: usize,
    },

    /// An edit arrived while there was nothing to edit
    #[error("No active drawing session or shape")]
    NoActiveSession,

    /// A drawing session was started while another one is open
    #[error("A drawing session is already active")]
    SessionActive,

    /// The point coincides with an existing vertex
    #[error("Point coincides with existing vertex {index}")]
    DuplicateVertex {
        /// The vertex the point collides with.
        index: usize,
    },

    /// A submitted distance was not a usable length
    #[error("Invalid distance: {value}")]
    InvalidDistance {
        /// The rejected value, in meters.
        value: f64,
    },

    /// A surface event referenced a marker, label or path nobody owns
    #[error("Unknown {kind} {id}")]
    UnknownTarget {
        /// The kind of handle, e.g. "marker".
        kind: &'static str,
        /// The raw handle value.
        id: u64,
    },
}

impl EditError {
    /// Check whether this error indicates broken wiring rather than user input
    pub fn is_programming_error(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}

/// Result type for editing operations
pub type Result<T> = std::result::Result<T, EditError>;
