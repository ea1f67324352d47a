//! Opaque identifiers for shapes and surface visuals.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            pub fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

handle_id!(
    /// A registered shape, numbered in insertion order from 1
    ShapeId,
    "shape"
);
handle_id!(
    /// A point marker on the map surface
    MarkerId,
    "marker"
);
handle_id!(
    /// A distance label overlay on the map surface
    OverlayId,
    "overlay"
);
handle_id!(
    /// A polyline or polygon visual on the map surface
    PathId,
    "path"
);
