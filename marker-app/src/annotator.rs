//! The annotator: one session wired to its collaborators.

use marker_core::{
    GestureEvent, ImageStore, MarkerGeometry, Notice, Notifier, PixelBuffer, SaveOutcome, Session,
};
use marker_renderer::{decode_image, encode, ImageFormat, MarkerCompositor};
use serde::{Deserialize, Serialize};

use crate::capture::CaptureOutcome;
use crate::config::{output_format_for, AnnotatorConfig, HostView};
use crate::error::{ConfigError, SaveError};

/// Everything the host can feed into the annotator.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A pan or pinch update on the marker.
    Gesture(GestureEvent),
    /// The capture flow finished.
    CaptureFinished(CaptureOutcome),
    /// The save button was activated.
    SaveRequested,
    /// The host view was laid out again.
    HostResized(HostView),
}

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Redraw {
    /// Nothing visible changed.
    None,
    /// Move the marker view to this geometry.
    Marker {
        /// New marker geometry.
        geometry: MarkerGeometry,
    },
    /// Redraw the image and marker.
    Canvas,
}

/// Owns the session and routes host events through it.
///
/// Single-threaded: the host calls in from its UI thread, one event at a time.
pub struct Annotator<S, N> {
    config: AnnotatorConfig,
    session: Session,
    compositor: MarkerCompositor,
    store: S,
    notifier: N,
}

impl<S: ImageStore, N: Notifier> Annotator<S, N> {
    /// Start the annotator, restoring the last saved composite if the store
    /// holds a decodable one and using `placeholder` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid or the host
    /// view yields degenerate canvas bounds.
    pub fn launch(
        config: AnnotatorConfig,
        store: S,
        notifier: N,
        placeholder: PixelBuffer,
        host: HostView,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let bounds = config.canvas_bounds(host)?;
        let sizes = config.size_config(host)?;

        if let Some(name) = store
            .file_name()
            .filter(|name| *name != config.saved_image_name)
        {
            tracing::warn!(
                configured = %config.saved_image_name,
                slot = name,
                "Store file name differs from configuration, encoding for the store"
            );
        }

        let saved = restore_saved(&store);
        let session = Session::load_initial_image(saved, placeholder, bounds, sizes);
        let compositor = MarkerCompositor::new(config.composite_config());

        tracing::info!(
            canvas_width = bounds.width(),
            canvas_height = bounds.height(),
            min_size = sizes.min_size(),
            max_size = sizes.max_size(),
            "Annotator launched"
        );

        Ok(Self {
            config,
            session,
            compositor,
            store,
            notifier,
        })
    }

    /// Route one host event.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if a requested save failed. The user has already
    /// been notified by then. Other events never fail.
    pub fn dispatch(&mut self, event: AppEvent) -> Result<Redraw, SaveError> {
        match event {
            AppEvent::Gesture(gesture) => Ok(self
                .handle_gesture(gesture)
                .map_or(Redraw::None, |geometry| Redraw::Marker { geometry })),
            AppEvent::CaptureFinished(outcome) => Ok(if self.on_capture_complete(outcome) {
                Redraw::Canvas
            } else {
                Redraw::None
            }),
            AppEvent::SaveRequested => self.save().map(|_| Redraw::None),
            AppEvent::HostResized(host) => match self.config.canvas_bounds(host) {
                Ok(bounds) => {
                    self.session.set_bounds(bounds);
                    Ok(Redraw::Canvas)
                }
                Err(e) => {
                    tracing::warn!("Ignoring resize to {host:?}: {e}");
                    Ok(Redraw::None)
                }
            },
        }
    }

    /// Apply a gesture to the marker.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Option<MarkerGeometry> {
        self.session.handle_gesture(event)
    }

    /// Accept the result of the capture flow. Returns whether the image changed.
    pub fn on_capture_complete(&mut self, outcome: CaptureOutcome) -> bool {
        match outcome {
            CaptureOutcome::Captured(image) => {
                self.session.replace_image(image);
                true
            }
            CaptureOutcome::Cancelled => {
                tracing::debug!("Capture cancelled");
                false
            }
        }
    }

    /// Save the composite if anything changed, notifying the user either way.
    ///
    /// On failure the session stays dirty so the save can be retried.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if compositing, encoding or writing failed.
    pub fn save(&mut self) -> Result<Notice, SaveError> {
        match self.persist() {
            Ok(notice) => {
                self.notifier.notify(notice);
                Ok(notice)
            }
            Err(e) => {
                tracing::warn!("Save failed: {e}");
                self.notifier.notify(Notice::SaveFailed);
                Err(e)
            }
        }
    }

    fn persist(&mut self) -> Result<Notice, SaveError> {
        let flattened = match self.session.try_save(&self.compositor)? {
            SaveOutcome::NoChanges => return Ok(Notice::NoChanges),
            SaveOutcome::Composited(flattened) => flattened,
        };

        let bytes = encode(&flattened, self.output_format(), self.config.jpeg_quality)?;
        self.store.write(&bytes)?;
        self.session.mark_saved();

        tracing::info!(
            bytes = bytes.len(),
            width = flattened.width(),
            height = flattened.height(),
            "Saved composite"
        );
        Ok(Notice::Saved)
    }

    /// Encoding for the saved composite. A file-backed store's own file name
    /// wins over the configured one, so the bytes always match the slot.
    fn output_format(&self) -> ImageFormat {
        self.store
            .file_name()
            .map_or_else(|| self.config.output_format(), output_format_for)
    }

    /// The session state.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// The image store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The notifier.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

/// Read and decode the last saved composite. Any failure falls back to `None`.
fn restore_saved<S: ImageStore>(store: &S) -> Option<PixelBuffer> {
    let bytes = match store.read() {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Could not read saved image, using placeholder: {e}");
            return None;
        }
    };

    match decode_image(&bytes) {
        Ok(image) => {
            tracing::debug!(
                format = ?ImageFormat::from_magic_bytes(&bytes),
                "Restored saved composite"
            );
            Some(image)
        }
        Err(e) => {
            tracing::warn!("Saved image is unreadable, using placeholder: {e}");
            None
        }
    }
}
