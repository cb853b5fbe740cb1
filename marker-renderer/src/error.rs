//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while compositing, encoding or decoding.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Stored bytes could not be decoded into an image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The composite could not be encoded.
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// A pixel buffer could not be built or converted.
    #[error("Invalid image resource: {0}")]
    Resource(String),
}

impl From<marker_core::CoreError> for RenderError {
    fn from(err: marker_core::CoreError) -> Self {
        Self::Resource(err.to_string())
    }
}
