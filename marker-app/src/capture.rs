//! Completion of the modal capture flow.

use marker_core::PixelBuffer;

/// What the capture source delivered when its flow finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A photo was taken.
    Captured(PixelBuffer),
    /// The user dismissed the capture flow.
    Cancelled,
}

impl From<Option<PixelBuffer>> for CaptureOutcome {
    fn from(image: Option<PixelBuffer>) -> Self {
        image.map_or(Self::Cancelled, Self::Captured)
    }
}
