//! Geodesic math on latitude/longitude points.
//!
//! All functions treat the Earth as a sphere of radius [`EARTH_RADIUS_M`],
//! which is what web map surfaces use for their distance and area readouts.
//! Coordinates are in degrees, lengths in meters, areas in square meters.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Sphere radius used for distance and area (meters).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Below this central angle (radians) interpolation falls back to linear.
const MIN_INTERPOLATION_ANGLE: f64 = 1e-6;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Great-circle distance between two points (haversine).
pub fn distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Signed spherical area of a ring that closes implicitly from last to first.
///
/// Returns 0 for fewer than three points. Repeating the first point at the end
/// does not change the result.
pub fn signed_area(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let Some(last) = ring.last() else {
        return 0.0;
    };
    let mut prev_tan_lat = ((FRAC_PI_2 - last.lat.to_radians()) / 2.0).tan();
    let mut prev_lng = last.lng.to_radians();

    let mut total = 0.0;
    for point in ring {
        let tan_lat = ((FRAC_PI_2 - point.lat.to_radians()) / 2.0).tan();
        let lng = point.lng.to_radians();
        total += polar_triangle_area(tan_lat, lng, prev_tan_lat, prev_lng);
        prev_tan_lat = tan_lat;
        prev_lng = lng;
    }

    total * EARTH_RADIUS_M * EARTH_RADIUS_M
}

/// Unsigned spherical area of a ring.
pub fn area(ring: &[GeoPoint]) -> f64 {
    signed_area(ring).abs()
}

// Signed area of the triangle formed by the pole and two points, given as
// tan of half the colatitude and longitude in radians.
fn polar_triangle_area(tan1: f64, lng1: f64, tan2: f64, lng2: f64) -> f64 {
    let delta_lng = lng1 - lng2;
    let t = tan1 * tan2;
    2.0 * (t * delta_lng.sin()).atan2(1.0 + t * delta_lng.cos())
}

/// Point at `fraction` along the great-circle segment from `from` to `to`.
pub fn interpolate(from: GeoPoint, to: GeoPoint, fraction: f64) -> GeoPoint {
    let from_lat = from.lat.to_radians();
    let from_lng = from.lng.to_radians();
    let to_lat = to.lat.to_radians();
    let to_lng = to.lng.to_radians();

    let angle = distance(from, to) / EARTH_RADIUS_M;
    let sin_angle = angle.sin();
    if sin_angle < MIN_INTERPOLATION_ANGLE {
        return interpolate_by_ratio(from, to, fraction);
    }

    let a = ((1.0 - fraction) * angle).sin() / sin_angle;
    let b = (fraction * angle).sin() / sin_angle;

    let x = a * from_lat.cos() * from_lng.cos() + b * to_lat.cos() * to_lng.cos();
    let y = a * from_lat.cos() * from_lng.sin() + b * to_lat.cos() * to_lng.sin();
    let z = a * from_lat.sin() + b * to_lat.sin();

    GeoPoint::new(
        z.atan2((x * x + y * y).sqrt()).to_degrees(),
        y.atan2(x).to_degrees(),
    )
}

/// Geodesic midpoint of a segment.
pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    interpolate(a, b, 0.5)
}

/// Scales the vector from `anchor` to `far` by `ratio`, independently on
/// latitude and longitude.
pub fn interpolate_by_ratio(anchor: GeoPoint, far: GeoPoint, ratio: f64) -> GeoPoint {
    GeoPoint::new(
        anchor.lat + (far.lat - anchor.lat) * ratio,
        anchor.lng + (far.lng - anchor.lng) * ratio,
    )
}

/// Moves `far` along its direction from `anchor` so the segment measures
/// `desired` meters.
///
/// The first step applies `desired / distance(anchor, far)` as a planar ratio;
/// each of the `refinements` extra steps repeats it from the previous result,
/// which removes the error of the planar approximation on long or diagonal
/// edges. Returns `None` when `anchor` and `far` coincide.
pub fn reposition_along(
    anchor: GeoPoint,
    far: GeoPoint,
    desired: f64,
    refinements: u8,
) -> Option<GeoPoint> {
    let current = distance(anchor, far);
    if current <= 0.0 {
        return None;
    }

    let mut result = interpolate_by_ratio(anchor, far, desired / current);
    for _ in 0..refinements {
        let measured = distance(anchor, result);
        if measured <= 0.0 {
            break;
        }
        result = interpolate_by_ratio(anchor, result, desired / measured);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn distance_one_degree_on_equator() {
        let d = distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert_close(d, EARTH_RADIUS_M * std::f64::consts::PI / 180.0, 1e-6);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(48.8566, 2.3522);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn area_of_degenerate_rings_is_zero() {
        assert_eq!(area(&[]), 0.0);
        assert_eq!(area(&[GeoPoint::new(1.0, 1.0)]), 0.0);
        assert_eq!(area(&[GeoPoint::new(1.0, 1.0), GeoPoint::new(2.0, 2.0)]), 0.0);
    }

    #[test]
    fn area_of_small_square_matches_planar() {
        let d = (100.0 / EARTH_RADIUS_M).to_degrees();
        let ring = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, d),
            GeoPoint::new(d, d),
            GeoPoint::new(d, 0.0),
        ];
        assert_close(area(&ring), 10_000.0, 0.01);
    }

    #[test]
    fn area_ignores_explicit_closing_point() {
        let open = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
        ];
        let mut closed = open.to_vec();
        closed.push(open[0]);
        assert_close(area(&open), area(&closed), 1e-3);
    }

    #[test]
    fn winding_flips_sign() {
        let ring = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 1.0),
        ];
        let mut reversed = ring;
        reversed.reverse();
        assert_close(signed_area(&ring), -signed_area(&reversed), 1e-3);
    }

    #[test]
    fn midpoint_on_meridian() {
        let m = midpoint(GeoPoint::new(10.0, 5.0), GeoPoint::new(20.0, 5.0));
        assert_close(m.lat, 15.0, 1e-9);
        assert_close(m.lng, 5.0, 1e-9);
    }

    #[test]
    fn interpolate_endpoints() {
        let a = GeoPoint::new(51.5, -0.12);
        let b = GeoPoint::new(40.7, -74.0);
        let start = interpolate(a, b, 0.0);
        let end = interpolate(a, b, 1.0);
        assert_close(start.lat, a.lat, 1e-9);
        assert_close(end.lng, b.lng, 1e-9);
    }

    #[test]
    fn ratio_interpolation_is_linear() {
        let p = interpolate_by_ratio(GeoPoint::new(1.0, 2.0), GeoPoint::new(3.0, 6.0), 0.5);
        assert_eq!(p, GeoPoint::new(2.0, 4.0));
    }

    #[test]
    fn reposition_degenerate_edge() {
        let p = GeoPoint::new(10.0, 10.0);
        assert!(reposition_along(p, p, 50.0, 2).is_none());
    }

    #[test]
    fn reposition_diagonal_edge_at_latitude() {
        let anchor = GeoPoint::new(52.0, 13.0);
        let far = GeoPoint::new(52.0008, 13.0011);
        let moved = reposition_along(anchor, far, 250.0, 2).expect("non-degenerate edge");
        assert_close(distance(anchor, moved), 250.0, 1e-3);
    }
}
