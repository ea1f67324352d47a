//! Visual styles and editor behaviour options.
//!
//! These are plain serde structs so the settings layer can persist them
//! unchanged; every field has a default so partial files load.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// What a marker represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// A ring vertex
    Vertex,
    /// The midpoint handle of an edge
    EdgeHandle,
}

/// Appearance of a point marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub kind: MarkerKind,
    pub fill: Color,
    pub stroke: Color,
    /// Radius in screen pixels
    pub radius_px: f32,
    pub stroke_width_px: f32,
}

impl MarkerStyle {
    pub fn vertex(fill: Color) -> Self {
        Self {
            kind: MarkerKind::Vertex,
            fill,
            stroke: Color::rgb(255, 255, 255),
            radius_px: 6.0,
            stroke_width_px: 2.0,
        }
    }

    pub fn edge_handle(fill: Color) -> Self {
        Self {
            kind: MarkerKind::EdgeHandle,
            fill,
            stroke: Color::rgb(255, 255, 255),
            radius_px: 4.0,
            stroke_width_px: 1.0,
        }
    }
}

/// Appearance of a polyline or polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub stroke: Color,
    pub stroke_width_px: f32,
    /// Fill for polygons; `None` draws an outline only
    pub fill: Option<Color>,
    /// Fill opacity in `[0, 1]`
    pub fill_opacity: f32,
}

/// Styles and behaviour of the field editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    /// Vertex markers of the ring being drawn
    pub drawing_vertex: MarkerStyle,
    /// Vertex markers of closed shapes
    pub editing_vertex: MarkerStyle,
    /// Edge midpoint handles
    pub edge_handle: MarkerStyle,
    /// Trailing polyline while drawing
    pub drawing_path: PathStyle,
    /// Filled polygon of closed shapes
    pub shape_path: PathStyle,
    /// Vertical screen offset of distance labels above the edge midpoint
    pub label_offset_px: f64,
    /// Clicks closer than this to an endpoint do not insert a vertex
    pub vertex_snap_m: f64,
    /// Extra correction passes for typed edge lengths
    pub distance_refinements: u8,
    /// Clicking the first vertex of a drawing closes the ring
    pub close_on_first_vertex: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        let accent = Color::rgb(0x1e, 0x88, 0xe5);
        Self {
            drawing_vertex: MarkerStyle::vertex(Color::rgb(0xff, 0x98, 0x00)),
            editing_vertex: MarkerStyle::vertex(accent),
            edge_handle: MarkerStyle::edge_handle(Color::rgba(0xff, 0xff, 0xff, 0xcc)),
            drawing_path: PathStyle {
                stroke: Color::rgb(0xff, 0x98, 0x00),
                stroke_width_px: 2.0,
                fill: None,
                fill_opacity: 0.0,
            },
            shape_path: PathStyle {
                stroke: accent,
                stroke_width_px: 2.0,
                fill: Some(accent),
                fill_opacity: 0.35,
            },
            label_offset_px: 14.0,
            vertex_snap_m: 0.5,
            distance_refinements: 2,
            close_on_first_vertex: true,
        }
    }
}
