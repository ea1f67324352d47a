//! Ordered vertex sequence of one field boundary.

use fieldkit_core::{EditError, GeoPoint, Result};
use serde::{Deserialize, Serialize};

/// Minimum vertex count of a closed ring.
pub const MIN_CLOSED_VERTICES: usize = 3;

/// Vertices of a polygon in winding order.
///
/// A closed ring connects its last vertex back to the first implicitly; the
/// first point is never stored twice. The ring knows nothing about markers:
/// callers that key state by index must shift it themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexRing {
    points: Vec<GeoPoint>,
}

impl VertexRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn append(&mut self, point: GeoPoint) {
        self.points.push(point);
    }

    /// Inserts `point` before index `index`; `index == len` appends.
    pub fn insert_at(&mut self, index: usize, point: GeoPoint) -> Result<()> {
        if index > self.points.len() {
            return Err(self.out_of_range(index));
        }
        self.points.insert(index, point);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<GeoPoint> {
        if index >= self.points.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.points.remove(index))
    }

    /// Replaces the vertex at `index`, returning the previous position.
    pub fn replace_at(&mut self, index: usize, point: GeoPoint) -> Result<GeoPoint> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, point))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn at(&self, index: usize) -> Result<GeoPoint> {
        self.points
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    /// Whether the ring has enough vertices to be closed.
    pub fn can_close(&self) -> bool {
        self.points.len() >= MIN_CLOSED_VERTICES
    }

    /// Number of edges: `n` when closed, `n - 1` while open.
    pub fn edge_count(&self, closed: bool) -> usize {
        let n = self.points.len();
        if closed {
            if n >= MIN_CLOSED_VERTICES {
                n
            } else {
                0
            }
        } else {
            n.saturating_sub(1)
        }
    }

    /// Index of the far vertex of edge `edge`.
    pub fn edge_end(&self, edge: usize, closed: bool) -> Result<usize> {
        if edge >= self.edge_count(closed) {
            return Err(self.out_of_range(edge));
        }
        Ok((edge + 1) % self.points.len())
    }

    /// Endpoints of edge `edge`.
    pub fn edge(&self, edge: usize, closed: bool) -> Result<(GeoPoint, GeoPoint)> {
        let end = self.edge_end(edge, closed)?;
        Ok((self.points[edge], self.points[end]))
    }

    /// The ring with its first point repeated at the end, for rendering and
    /// area computation. `None` below three vertices.
    pub fn to_closed_path(&self) -> Option<Vec<GeoPoint>> {
        if !self.can_close() {
            return None;
        }
        let mut path = Vec::with_capacity(self.points.len() + 1);
        path.extend_from_slice(&self.points);
        path.push(self.points[0]);
        Some(path)
    }

    fn out_of_range(&self, index: usize) -> EditError {
        EditError::IndexOutOfRange {
            index,
            len: self.points.len(),
        }
    }
}
