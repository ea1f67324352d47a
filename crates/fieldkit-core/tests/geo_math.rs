use fieldkit_core::geo::{self, GeoPoint};
use fieldkit_core::{format_distance, DistanceInput};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = GeoPoint> {
    (-60.0f64..60.0, -170.0f64..170.0).prop_map(|(lat, lng)| GeoPoint::new(lat, lng))
}

proptest! {
    #[test]
    fn distance_to_self_is_zero(p in point()) {
        prop_assert_eq!(geo::distance(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric(a in point(), b in point()) {
        let ab = geo::distance(a, b);
        let ba = geo::distance(b, a);
        prop_assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn area_does_not_depend_on_start_vertex(
        origin in point(),
        dx in 0.001f64..0.05,
        dy in 0.001f64..0.05,
    ) {
        let ring = vec![
            origin,
            GeoPoint::new(origin.lat, origin.lng + dx),
            GeoPoint::new(origin.lat + dy, origin.lng + dx),
            GeoPoint::new(origin.lat + dy, origin.lng),
        ];
        let mut rotated = ring.clone();
        rotated.rotate_left(1);
        let a = geo::area(&ring);
        prop_assert!((a - geo::area(&rotated)).abs() < 1e-6 * a.max(1.0));
    }

    #[test]
    fn reposition_reaches_requested_length(
        anchor in point(),
        dlat in -0.01f64..0.01,
        dlng in -0.01f64..0.01,
        desired in 5.0f64..3000.0,
    ) {
        let far = GeoPoint::new(anchor.lat + dlat, anchor.lng + dlng);
        prop_assume!(geo::distance(anchor, far) > 1.0);
        let moved = geo::reposition_along(anchor, far, desired, 2).unwrap();
        prop_assert!((geo::distance(anchor, moved) - desired).abs() < 1e-3);
    }
}

#[test]
fn label_text_for_typical_field_edges() {
    assert_eq!(format_distance(87.3), "87 m");
    assert_eq!(format_distance(1520.0), "1.52 km");
    assert_eq!(DistanceInput::from_meters(1520.0).to_meters(), 1520.0);
}
