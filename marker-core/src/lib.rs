//! # Marker Core
//!
//! Core logic for placing a single translucent marker over a photo.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 marker-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Placement Engine │  Gesture Events         │
//! │  - Size clamp     │  - Pan                  │
//! │  - Axis clamp     │  - Pinch began/changed  │
//! ├─────────────────────────────────────────────┤
//! │  Session          │  Collaborator Seams     │
//! │  - Image + marker │  - Compositor           │
//! │  - Dirty flag     │  - Image store          │
//! │                   │  - Notifier             │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod geometry;
pub mod notice;
pub mod pixel;
pub mod session;
pub mod store;

pub use error::{CoreError, CoreResult};
pub use event::GestureEvent;
pub use geometry::{clamp_geometry, CanvasBounds, MarkerGeometry, Point, SizeConfig};
pub use notice::{LogNotifier, Notice, Notifier, RecordingNotifier};
pub use pixel::PixelBuffer;
pub use session::{Compositor, SaveOutcome, Session};
pub use store::{
    FileImageStore, ImageStore, MemoryImageStore, StoreError, StoreResult, SAVED_IMAGE_NAME,
};

/// Marker core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
