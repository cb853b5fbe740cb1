//! # Marker Renderer
//!
//! Flattens the photo and marker into the image that gets saved, and moves
//! stored images in and out of pixel buffers.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              MarkerCompositor               │
//! │  background → aspect-fit photo → marker     │
//! ├──────────────────────┬──────────────────────┤
//! │  encode (JPEG/PNG)   │  decode (any)        │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod composite;
pub mod error;

pub use codec::{decode_image, encode, encode_jpeg, encode_png, ImageFormat, DEFAULT_JPEG_QUALITY};
pub use composite::{CompositeConfig, MarkerCompositor, MarkerShape, MarkerStyle};
pub use error::{RenderError, RenderResult};
