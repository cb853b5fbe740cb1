//! Session state: the current image, the marker over it, and whether the
//! pair has changed since the last successful save.

use crate::{
    clamp_geometry, CanvasBounds, GestureEvent, MarkerGeometry, PixelBuffer, SizeConfig,
};

/// Flattens the image and the marker into what is visually shown.
pub trait Compositor {
    /// Error raised when compositing fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produce one pixel buffer from the image and marker laid out in `bounds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be produced.
    fn composite(
        &self,
        image: &PixelBuffer,
        marker: &MarkerGeometry,
        bounds: CanvasBounds,
    ) -> Result<PixelBuffer, Self::Error>;
}

/// Result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing changed since the last save; no compositing happened.
    NoChanges,
    /// The flattened image, ready to be encoded and persisted.
    Composited(PixelBuffer),
}

/// The single annotation session of a running app.
///
/// Owned by the host and mutated through `&mut self` from one thread; every
/// operation here is applied atomically.
#[derive(Debug, Clone)]
pub struct Session {
    image: PixelBuffer,
    marker: MarkerGeometry,
    dirty: bool,
    bounds: CanvasBounds,
    sizes: SizeConfig,
    pinch_start_size: Option<f32>,
}

impl Session {
    /// Start a session from the previously saved image, or the placeholder
    /// when nothing was saved. The marker starts centered at its smallest size.
    #[must_use]
    pub fn load_initial_image(
        saved: Option<PixelBuffer>,
        placeholder: PixelBuffer,
        bounds: CanvasBounds,
        sizes: SizeConfig,
    ) -> Self {
        let restored = saved.is_some();
        let image = saved.unwrap_or(placeholder);
        tracing::info!(
            restored,
            width = image.width(),
            height = image.height(),
            "Loaded initial image"
        );
        Self {
            image,
            marker: MarkerGeometry::default_for(bounds, sizes),
            dirty: false,
            bounds,
            sizes,
            pinch_start_size: None,
        }
    }

    /// Swap in a newly captured image.
    ///
    /// The marker keeps its position and size from the previous image.
    pub fn replace_image(&mut self, image: PixelBuffer) {
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Replacing image"
        );
        self.image = image;
        self.dirty = true;
    }

    /// Overwrite the marker geometry.
    pub fn apply_marker_update(&mut self, geometry: MarkerGeometry) {
        self.marker = geometry;
        self.dirty = true;
    }

    /// Handle one gesture event, returning the new geometry if the marker was
    /// updated.
    ///
    /// Updates mark the session dirty even when the clamped geometry is
    /// unchanged.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Option<MarkerGeometry> {
        let geometry = match event {
            GestureEvent::PanChanged { location } => {
                clamp_geometry(location, self.marker.size, self.bounds, self.sizes)
            }
            GestureEvent::PinchBegan => {
                self.pinch_start_size = Some(self.marker.size);
                return None;
            }
            GestureEvent::PinchChanged { scale } => {
                let start = self.pinch_start_size.unwrap_or(self.marker.size);
                clamp_geometry(self.marker.center(), start * scale, self.bounds, self.sizes)
            }
            GestureEvent::PinchEnded => {
                self.pinch_start_size = None;
                return None;
            }
        };

        tracing::debug!(?event, ?geometry, "Marker updated");
        self.apply_marker_update(geometry);
        Some(geometry)
    }

    /// Adopt new canvas bounds after a layout change.
    ///
    /// The marker is re-clamped into the new area. The size range is left as
    /// derived at startup and the dirty flag is untouched.
    pub fn set_bounds(&mut self, bounds: CanvasBounds) {
        self.bounds = bounds;
        self.marker = clamp_geometry(self.marker.center(), self.marker.size, bounds, self.sizes);
    }

    /// Composite the current image and marker if there is anything to save.
    ///
    /// The compositor is not called when the session is clean. The caller
    /// persists the result and then calls [`Session::mark_saved`].
    ///
    /// # Errors
    ///
    /// Propagates the compositor's error; the session itself is unchanged.
    pub fn try_save<C: Compositor>(&self, compositor: &C) -> Result<SaveOutcome, C::Error> {
        if !self.dirty {
            return Ok(SaveOutcome::NoChanges);
        }
        let flattened = compositor.composite(&self.image, &self.marker, self.bounds)?;
        Ok(SaveOutcome::Composited(flattened))
    }

    /// Record that the last composite was persisted.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The current image.
    #[must_use]
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// The current marker geometry.
    #[must_use]
    pub fn marker(&self) -> MarkerGeometry {
        self.marker
    }

    /// The canvas bounds the marker is clamped against.
    #[must_use]
    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    /// The allowed marker size range.
    #[must_use]
    pub fn sizes(&self) -> SizeConfig {
        self.sizes
    }

    /// Whether a pinch is in progress.
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch_start_size.is_some()
    }
}
