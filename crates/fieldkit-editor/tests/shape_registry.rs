use std::sync::Arc;

use fieldkit_core::{EditorOptions, EventCategory, EventFilter, FieldEvent, GeoPoint, ShapeId, EARTH_RADIUS_M};
use fieldkit_editor::{FieldEditor, RecordingSurface, SurfaceEvent};
use parking_lot::Mutex;

/// Corners of an equatorial square of `side_m` meters starting at `lng`.
fn square_at(lng: f64, side_m: f64) -> Vec<GeoPoint> {
    let d = (side_m / EARTH_RADIUS_M).to_degrees();
    vec![
        GeoPoint::new(0.0, lng),
        GeoPoint::new(0.0, lng + d),
        GeoPoint::new(d, lng + d),
        GeoPoint::new(d, lng),
    ]
}

fn draw(editor: &mut FieldEditor<RecordingSurface>, points: &[GeoPoint]) {
    editor.start_drawing().unwrap();
    for p in points {
        editor.handle_event(SurfaceEvent::Click(*p)).unwrap();
    }
    editor
        .handle_event(SurfaceEvent::DoubleClick(points[points.len() - 1]))
        .unwrap();
}

#[test]
fn test_two_hectare_squares_sum_to_two() {
    let mut editor = FieldEditor::new(RecordingSurface::new(), EditorOptions::default());
    draw(&mut editor, &square_at(0.0, 100.0));
    draw(&mut editor, &square_at(0.01, 100.0));

    assert_eq!(editor.get_shapes().len(), 2);
    assert!((editor.total_area_hectares() - 2.0).abs() < 1e-3);
}

#[test]
fn test_area_callback_follows_edits() {
    let mut editor = FieldEditor::new(RecordingSurface::new(), EditorOptions::default());
    let totals = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&totals);
    editor.on_total_area_changed(move |hectares| sink.lock().push(hectares));

    draw(&mut editor, &square_at(0.0, 100.0));
    assert_eq!(totals.lock().len(), 1);
    assert!((totals.lock()[0] - 1.0).abs() < 1e-3);

    // Stretch one corner outwards
    let id = ShapeId::new(1);
    let marker = editor
        .shape(id)
        .and_then(|s| s.projection().vertex_marker(2))
        .unwrap();
    let far = square_at(0.0, 200.0)[2];
    editor
        .handle_event(SurfaceEvent::MarkerDrag {
            marker,
            position: far,
        })
        .unwrap();

    let totals = totals.lock();
    assert_eq!(totals.len(), 2);
    assert!(totals[1] > totals[0]);
    assert!((totals[1] - editor.total_area_hectares()).abs() < 1e-12);
}

#[test]
fn test_handle_drag_steps_notify_total() {
    let mut editor = FieldEditor::new(RecordingSurface::new(), EditorOptions::default());
    draw(&mut editor, &square_at(0.0, 100.0));

    let count = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&count);
    editor.on_total_area_changed(move |_| *sink.lock() += 1);

    let handle = editor
        .shape(ShapeId::new(1))
        .and_then(|s| s.projection().edge_marker(0))
        .map(|e| e.handle())
        .unwrap();
    for step in 1..=3 {
        editor
            .handle_event(SurfaceEvent::MarkerDrag {
                marker: handle,
                position: GeoPoint::new(-0.0001 * step as f64, 0.0005),
            })
            .unwrap();
    }
    assert_eq!(*count.lock(), 3);
}

#[test]
fn test_shape_events_on_the_bus() {
    let mut editor = FieldEditor::new(RecordingSurface::new(), EditorOptions::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    editor.events().subscribe(
        EventFilter::Categories(vec![EventCategory::Shape]),
        move |event| sink.lock().push(event.clone()),
    );

    draw(&mut editor, &square_at(0.0, 100.0));
    let polygon = editor.shape(ShapeId::new(1)).unwrap().polygon();
    editor
        .handle_event(SurfaceEvent::EdgeClick {
            path: polygon,
            edge: 0,
            position: square_at(0.0, 50.0)[1],
        })
        .unwrap();

    let seen = seen.lock();
    assert_eq!(
        *seen,
        vec![
            FieldEvent::ShapeRegistered {
                shape: ShapeId::new(1),
                vertices: 4
            },
            FieldEvent::ShapeEdited {
                shape: ShapeId::new(1),
                vertices: 5
            },
        ]
    );
}

#[test]
fn test_teardown_removes_every_visual() {
    let mut editor = FieldEditor::new(RecordingSurface::new(), EditorOptions::default());
    draw(&mut editor, &square_at(0.0, 100.0));
    editor.start_drawing().unwrap();
    editor
        .handle_event(SurfaceEvent::Click(GeoPoint::new(0.01, 0.01)))
        .unwrap();
    editor
        .handle_event(SurfaceEvent::Click(GeoPoint::new(0.01, 0.011)))
        .unwrap();

    let surface = editor.teardown();
    assert_eq!(surface.live_visuals(), 0);
    assert_eq!(surface.stale_removals(), 0);
}
