//! # Marker App
//!
//! Wires a marker session to its collaborators: the compositor, the image
//! store and the notifier. The host supplies the placeholder image, the
//! host view size and the stream of UI events.
//!
//! ## Flow
//!
//! ```text
//! gesture ──► placement engine ──► session ──► Redraw::Marker
//! capture ──► session.replace_image ────────► Redraw::Canvas
//! save    ──► composite ──► encode ──► store ──► mark saved ──► notice
//! ```
//!
//! ## Usage
//!
//! ```
//! use marker_app::{AnnotatorConfig, Annotator, HostView};
//! use marker_core::{GestureEvent, LogNotifier, MemoryImageStore, Notice, PixelBuffer, Point};
//!
//! let placeholder = PixelBuffer::solid(64, 48, [40, 40, 40, 255]).unwrap();
//! let mut annotator = Annotator::launch(
//!     AnnotatorConfig::default(),
//!     MemoryImageStore::new(),
//!     LogNotifier,
//!     placeholder,
//!     HostView::new(320.0, 480.0),
//! )
//! .unwrap();
//!
//! annotator.handle_gesture(GestureEvent::PanChanged { location: Point::new(100.0, 100.0) });
//! assert_eq!(annotator.save().unwrap(), Notice::Saved);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod annotator;
mod capture;
pub mod config;
pub mod error;
pub mod telemetry;

pub use annotator::{Annotator, AppEvent, Redraw};
pub use capture::CaptureOutcome;
pub use config::{AnnotatorConfig, HostView};
pub use error::{ConfigError, SaveError};
