//! User-facing notices raised by the save action.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// A modal message acknowledged by a single dismiss action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The composite was written to the store.
    Saved,
    /// Encoding or writing the composite failed.
    SaveFailed,
    /// Save was requested with nothing changed.
    NoChanges,
}

impl Notice {
    /// Alert title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Saved => "Image Saved",
            Self::SaveFailed => "Error",
            Self::NoChanges => "Info",
        }
    }

    /// Alert body.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Saved => "Image was saved successfully",
            Self::SaveFailed => "Could not save image. Please make sure you allow saving photos!",
            Self::NoChanges => "No changes to save",
        }
    }

    /// Label of the single dismiss action.
    #[must_use]
    pub fn dismiss_label(&self) -> &'static str {
        "OK"
    }
}

/// Fire-and-forget sink for notices.
pub trait Notifier {
    /// Present a notice to the user.
    fn notify(&self, notice: Notice);
}

/// Emits notices as log events. Useful for headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::SaveFailed => {
                tracing::error!(title = notice.title(), "{}", notice.message());
            }
            Notice::Saved | Notice::NoChanges => {
                tracing::info!(title = notice.title(), "{}", notice.message());
            }
        }
    }
}

/// Collects every notice it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// The most recent notice, if any.
    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .copied()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notice);
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}
