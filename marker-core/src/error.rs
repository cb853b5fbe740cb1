//! Error types for core value construction.
//!
//! Placement and session operations are total. Only the constructors that
//! guard data-model invariants can fail.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while constructing core values.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Canvas dimensions must be finite and strictly positive.
    #[error("Invalid canvas bounds: {width}x{height}")]
    InvalidBounds {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },

    /// Marker size limits must satisfy `0 < min <= max`.
    #[error("Invalid marker size range: min {min}, max {max}")]
    InvalidSizeConfig {
        /// Requested minimum size.
        min: f32,
        /// Requested maximum size.
        max: f32,
    },

    /// Pixel data does not match the declared dimensions.
    #[error("Invalid pixel buffer: {0}")]
    InvalidPixelBuffer(String),
}
