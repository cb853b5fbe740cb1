//! Gesture events driving the marker.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Recognized gestures on the marker, delivered in order on a single thread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", content = "data")]
pub enum GestureEvent {
    /// Pan moved; the marker follows the finger.
    PanChanged {
        /// Touch location in canvas coordinates.
        location: Point,
    },

    /// Pinch started; the current marker size becomes the scaling base.
    PinchBegan,

    /// Pinch moved.
    PinchChanged {
        /// Cumulative scale since the pinch began (1.0 = no change).
        scale: f32,
    },

    /// Pinch finished or was cancelled.
    PinchEnded,
}

impl GestureEvent {
    /// Check whether handling this event can move or resize the marker.
    #[must_use]
    pub fn updates_marker(&self) -> bool {
        matches!(self, Self::PanChanged { .. } | Self::PinchChanged { .. })
    }
}
