//! Integration tests for the annotator wired to a file store (marker-app).

use marker_app::{
    Annotator, AnnotatorConfig, AppEvent, CaptureOutcome, HostView, Redraw, SaveError,
};
use marker_core::{
    FileImageStore, GestureEvent, ImageStore, MarkerGeometry, MemoryImageStore, Notice,
    PixelBuffer, Point, RecordingNotifier,
};
use marker_renderer::ImageFormat;
use proptest::prelude::*;

/// Host view whose canvas is 300x300 with markers from 90 to 270.
fn host() -> HostView {
    HostView::new(1000.0 / 3.0, 1000.0 / 3.0)
}

fn placeholder() -> PixelBuffer {
    PixelBuffer::solid(30, 30, [90, 90, 90, 255]).expect("valid buffer")
}

fn photo() -> PixelBuffer {
    PixelBuffer::solid(60, 40, [10, 120, 200, 255]).expect("valid buffer")
}

fn launch_with<S: ImageStore>(
    store: S,
    config: AnnotatorConfig,
) -> Annotator<S, RecordingNotifier> {
    Annotator::launch(config, store, RecordingNotifier::new(), placeholder(), host())
        .expect("launch")
}

fn assert_geometry(actual: MarkerGeometry, x: f32, y: f32, size: f32) {
    assert!((actual.center_x - x).abs() < 1e-2, "center_x {actual:?}");
    assert!((actual.center_y - y).abs() < 1e-2, "center_y {actual:?}");
    assert!((actual.size - size).abs() < 1e-2, "size {actual:?}");
}

// ==========================================================================
// Placement through the app
// ==========================================================================

#[test]
fn test_derived_layout_matches_reference_scenarios() {
    let mut annotator = launch_with(MemoryImageStore::new(), AnnotatorConfig::default());
    let sizes = annotator.session().sizes();
    assert!((sizes.min_size() - 90.0).abs() < 1e-2);
    assert!((sizes.max_size() - 270.0).abs() < 1e-2);
    assert_geometry(annotator.session().marker(), 150.0, 150.0, 90.0);

    // Corner pan with a 100-wide marker lands at (50, 50).
    annotator.handle_gesture(GestureEvent::PinchBegan);
    annotator.handle_gesture(GestureEvent::PinchChanged {
        scale: 100.0 / 90.0,
    });
    annotator.handle_gesture(GestureEvent::PinchEnded);
    annotator.handle_gesture(GestureEvent::PanChanged {
        location: Point::new(10.0, 10.0),
    });
    assert_geometry(annotator.session().marker(), 50.0, 50.0, 100.0);

    // Oversized pinch saturates at 270 and re-centers against the edges.
    annotator.handle_gesture(GestureEvent::PanChanged {
        location: Point::new(150.0, 150.0),
    });
    annotator.handle_gesture(GestureEvent::PinchBegan);
    annotator.handle_gesture(GestureEvent::PinchChanged { scale: 5.0 });
    assert_geometry(annotator.session().marker(), 150.0, 150.0, 270.0);

    annotator.handle_gesture(GestureEvent::PinchChanged { scale: 0.1 });
    assert_geometry(annotator.session().marker(), 150.0, 150.0, 90.0);
}

// ==========================================================================
// Save and restore
// ==========================================================================

#[test]
fn test_save_then_relaunch_restores_composite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = AnnotatorConfig::default();

    {
        let store = config.file_store(dir.path()).expect("store");
        let mut annotator = launch_with(store, config.clone());

        annotator.on_capture_complete(CaptureOutcome::Captured(photo()));
        annotator.handle_gesture(GestureEvent::PanChanged {
            location: Point::new(200.0, 100.0),
        });
        assert_eq!(annotator.save().expect("save"), Notice::Saved);
        assert_eq!(annotator.notifier().notices(), vec![Notice::Saved]);

        let bytes = std::fs::read(dir.path().join("markedAndSaved.jpg")).expect("saved file");
        assert_eq!(ImageFormat::from_magic_bytes(&bytes), ImageFormat::Jpeg);
    }

    let store = config.file_store(dir.path()).expect("store");
    let annotator = launch_with(store, config);

    // Restored image is the canvas-sized composite, not the placeholder.
    let image = annotator.session().image();
    assert_eq!((image.width(), image.height()), (300, 300));
    assert!(!annotator.session().is_dirty());
    assert_geometry(annotator.session().marker(), 150.0, 150.0, 90.0);
}

#[test]
fn test_png_name_saves_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = AnnotatorConfig {
        saved_image_name: "marked.png".to_string(),
        ..AnnotatorConfig::default()
    };
    let store = config.file_store(dir.path()).expect("store");
    let mut annotator = launch_with(store, config);

    annotator.on_capture_complete(CaptureOutcome::Captured(photo()));
    annotator.save().expect("save");

    let bytes = std::fs::read(dir.path().join("marked.png")).expect("saved file");
    assert_eq!(ImageFormat::from_magic_bytes(&bytes), ImageFormat::Png);
}

#[test]
fn test_png_config_with_default_slot_writes_jpeg_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = AnnotatorConfig {
        saved_image_name: "out.png".to_string(),
        ..AnnotatorConfig::default()
    };
    let store = FileImageStore::with_data_dir(dir.path()).expect("store");
    let mut annotator = launch_with(store, config);

    annotator.on_capture_complete(CaptureOutcome::Captured(photo()));
    annotator.save().expect("save");

    // The slot is markedAndSaved.jpg, so the bytes must be JPEG.
    let bytes = std::fs::read(dir.path().join("markedAndSaved.jpg")).expect("saved file");
    assert_eq!(ImageFormat::from_magic_bytes(&bytes), ImageFormat::Jpeg);
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn test_second_save_without_changes_is_noop() {
    let store = MemoryImageStore::new();
    let mut annotator = launch_with(&store, AnnotatorConfig::default());

    annotator.on_capture_complete(CaptureOutcome::Captured(photo()));
    annotator.save().expect("save");
    let first = store.contents().expect("written");

    assert_eq!(annotator.save().expect("no-op"), Notice::NoChanges);
    assert_eq!(store.contents(), Some(first));
    assert_eq!(
        annotator.notifier().notices(),
        vec![Notice::Saved, Notice::NoChanges]
    );
}

#[test]
fn test_failed_save_can_be_retried() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("documents");
    let store = FileImageStore::with_data_dir(&data_dir).expect("store");
    let mut annotator = launch_with(store, AnnotatorConfig::default());
    std::fs::remove_dir(&data_dir).expect("remove");

    annotator.on_capture_complete(CaptureOutcome::Captured(photo()));
    let err = annotator
        .dispatch(AppEvent::SaveRequested)
        .expect_err("directory removed");
    assert!(matches!(err, SaveError::WriteFailed(_)));
    assert!(annotator.session().is_dirty());

    std::fs::create_dir_all(&data_dir).expect("recreate");
    assert_eq!(
        annotator.dispatch(AppEvent::SaveRequested).expect("retry"),
        Redraw::None
    );
    assert!(!annotator.session().is_dirty());
    assert_eq!(
        annotator.notifier().notices(),
        vec![Notice::SaveFailed, Notice::Saved]
    );
}

// ==========================================================================
// Resize
// ==========================================================================

#[test]
fn test_resize_reclamps_marker_and_keeps_size_range() {
    let mut annotator = launch_with(MemoryImageStore::new(), AnnotatorConfig::default());
    annotator.handle_gesture(GestureEvent::PanChanged {
        location: Point::new(300.0, 300.0),
    });
    let sizes_before = annotator.session().sizes();

    let redraw = annotator
        .dispatch(AppEvent::HostResized(HostView::new(250.0, 250.0)))
        .expect("resize");

    assert_eq!(redraw, Redraw::Canvas);
    assert_eq!(annotator.session().sizes(), sizes_before);
    assert_geometry(annotator.session().marker(), 180.0, 180.0, 90.0);
}

// ==========================================================================
// Event stream invariants
// ==========================================================================

fn arb_event() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        (-50.0f32..350.0, -50.0f32..350.0).prop_map(|(x, y)| AppEvent::Gesture(
            GestureEvent::PanChanged {
                location: Point::new(x, y)
            }
        )),
        Just(AppEvent::Gesture(GestureEvent::PinchBegan)),
        (0.0f32..4.0).prop_map(|scale| AppEvent::Gesture(GestureEvent::PinchChanged { scale })),
        Just(AppEvent::Gesture(GestureEvent::PinchEnded)),
        Just(AppEvent::CaptureFinished(CaptureOutcome::Cancelled)),
        Just(AppEvent::SaveRequested),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_saves_always_leave_session_clean(
        events in prop::collection::vec(arb_event(), 1..20)
    ) {
        let mut annotator = launch_with(MemoryImageStore::new(), AnnotatorConfig::default());

        for event in events {
            let saving = event == AppEvent::SaveRequested;
            let was_dirty = annotator.session().is_dirty();
            annotator.dispatch(event).expect("memory store accepts writes");

            if saving {
                prop_assert!(!annotator.session().is_dirty());
                let expected = if was_dirty { Notice::Saved } else { Notice::NoChanges };
                prop_assert_eq!(annotator.notifier().last(), Some(expected));
            }
            prop_assert!(annotator.session().marker().is_within(annotator.session().bounds()));
        }
    }
}
