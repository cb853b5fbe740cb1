//! Application error types.

use marker_core::{CoreError, StoreError};
use marker_renderer::RenderError;
use thiserror::Error;

/// Errors raised by the save action.
///
/// These never reach the session: the save boundary reports them to the
/// user, leaves the session dirty and hands them back for inspection.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Compositing or encoding the image failed.
    #[error("Could not render composite: {0}")]
    Render(#[from] RenderError),

    /// Storage denied or unavailable.
    #[error("Could not write composite: {0}")]
    WriteFailed(#[from] StoreError),
}

/// Errors loading or applying configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration JSON is malformed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Derived geometry is invalid for the host view.
    #[error("Invalid layout: {0}")]
    Layout(#[from] CoreError),
}
