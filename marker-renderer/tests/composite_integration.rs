//! Integration tests for compositing sessions and storing the result
//! (marker-renderer).

use marker_core::{
    CanvasBounds, GestureEvent, MarkerGeometry, PixelBuffer, Point, SaveOutcome, Session,
    SizeConfig,
};
use marker_renderer::{
    decode_image, encode, encode_jpeg, CompositeConfig, ImageFormat, MarkerCompositor,
    MarkerShape, MarkerStyle, DEFAULT_JPEG_QUALITY,
};

fn green_photo(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::solid(width, height, [0, 200, 0, 255]).expect("valid buffer")
}

fn session(photo: PixelBuffer) -> Session {
    Session::load_initial_image(
        None,
        photo,
        CanvasBounds::new(120.0, 90.0).expect("valid bounds"),
        SizeConfig::new(20.0, 80.0).expect("valid config"),
    )
}

fn square_compositor() -> MarkerCompositor {
    MarkerCompositor::new(CompositeConfig {
        style: MarkerStyle {
            color: [255, 0, 255],
            alpha: 1.0,
            shape: MarkerShape::Square,
        },
        ..CompositeConfig::default()
    })
}

// ==========================================================================
// Session → compositor
// ==========================================================================

#[test]
fn test_clean_session_is_not_composited() {
    let session = session(green_photo(12, 9));
    let outcome = session.try_save(&square_compositor()).expect("composite");
    assert_eq!(outcome, SaveOutcome::NoChanges);
}

#[test]
fn test_marker_lands_where_the_session_placed_it() {
    let mut session = session(green_photo(120, 90));
    session.handle_gesture(GestureEvent::PanChanged {
        location: Point::new(0.0, 0.0),
    });
    assert_eq!(session.marker(), MarkerGeometry::new(10.0, 10.0, 20.0));

    let SaveOutcome::Composited(flattened) =
        session.try_save(&square_compositor()).expect("composite")
    else {
        panic!("dirty session should composite");
    };

    assert_eq!((flattened.width(), flattened.height()), (120, 90));
    assert_eq!(flattened.pixel(5, 5), Some([255, 0, 255, 255]));
    assert_eq!(flattened.pixel(19, 19), Some([255, 0, 255, 255]));
    assert_eq!(flattened.pixel(60, 45), Some([0, 200, 0, 255]));
}

#[test]
fn test_translucent_marker_keeps_photo_visible() {
    let mut session = session(green_photo(120, 90));
    session.handle_gesture(GestureEvent::PanChanged {
        location: Point::new(60.0, 45.0),
    });

    let compositor = MarkerCompositor::with_defaults();
    let SaveOutcome::Composited(flattened) = session.try_save(&compositor).expect("composite")
    else {
        panic!("dirty session should composite");
    };

    let center = flattened.pixel(60, 45).expect("in range");
    // Half cyan over green: blue rises, green stays high.
    assert!(center[2] > 100, "{center:?}");
    assert!(center[1] > 150, "{center:?}");
}

// ==========================================================================
// Encode / decode
// ==========================================================================

#[test]
fn test_composite_survives_jpeg_round_trip() {
    let mut session = session(green_photo(40, 30));
    session.handle_gesture(GestureEvent::PinchBegan);
    session.handle_gesture(GestureEvent::PinchChanged { scale: 3.0 });

    let SaveOutcome::Composited(flattened) =
        session.try_save(&square_compositor()).expect("composite")
    else {
        panic!("dirty session should composite");
    };

    let bytes = encode_jpeg(&flattened, DEFAULT_JPEG_QUALITY).expect("encode");
    let restored = decode_image(&bytes).expect("decode");

    assert_eq!((restored.width(), restored.height()), (120, 90));
    // Lossy, but the marker center is still clearly magenta.
    let px = restored.pixel(60, 45).expect("in range");
    assert!(px[0] > 200 && px[1] < 60 && px[2] > 200, "{px:?}");
}

#[test]
fn test_restored_composite_can_seed_a_new_session() {
    let mut first = session(green_photo(12, 9));
    first.handle_gesture(GestureEvent::PanChanged {
        location: Point::new(100.0, 70.0),
    });
    let SaveOutcome::Composited(flattened) =
        first.try_save(&square_compositor()).expect("composite")
    else {
        panic!("dirty session should composite");
    };
    let bytes = encode(&flattened, ImageFormat::Png, DEFAULT_JPEG_QUALITY).expect("encode");

    let restored = decode_image(&bytes).expect("decode");
    let second = Session::load_initial_image(
        Some(restored),
        green_photo(1, 1),
        CanvasBounds::new(120.0, 90.0).expect("valid bounds"),
        SizeConfig::new(20.0, 80.0).expect("valid config"),
    );

    assert_eq!(second.image(), &flattened);
    assert!(!second.is_dirty());
}
