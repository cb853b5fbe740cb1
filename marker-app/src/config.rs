//! Annotator configuration.
//!
//! Every field has a default matching the stock app, so an empty JSON object
//! is a valid configuration.

use std::path::Path;

use marker_core::geometry::{CANVAS_WIDTH_FRACTION, MAX_SIZE_FRACTION, MIN_SIZE_FRACTION};
use marker_core::{CanvasBounds, FileImageStore, SizeConfig, StoreResult, SAVED_IMAGE_NAME};
use marker_renderer::{CompositeConfig, ImageFormat, MarkerStyle, DEFAULT_JPEG_QUALITY};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Size of the host view the canvas is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostView {
    /// Host view width.
    pub width: f32,
    /// Host view height.
    pub height: f32,
}

impl HostView {
    /// Create a host view size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Configuration for an [`Annotator`](crate::Annotator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// File name of the single saved composite. The extension picks the
    /// encoding (`.png` or JPEG otherwise).
    pub saved_image_name: String,
    /// JPEG quality 1-100.
    pub jpeg_quality: u8,
    /// Share of the host view the canvas occupies, on both axes.
    pub canvas_fraction: f32,
    /// Smallest marker as a share of the canvas width.
    pub min_size_fraction: f32,
    /// Largest marker as a share of the canvas width.
    pub max_size_fraction: f32,
    /// Marker appearance.
    pub marker: MarkerStyle,
    /// Background behind an aspect-fit photo (RGBA).
    pub background: [u8; 4],
    /// Output pixels per canvas unit.
    pub render_scale: f32,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            saved_image_name: SAVED_IMAGE_NAME.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            canvas_fraction: CANVAS_WIDTH_FRACTION,
            min_size_fraction: MIN_SIZE_FRACTION,
            max_size_fraction: MAX_SIZE_FRACTION,
            marker: MarkerStyle::default(),
            background: [0, 0, 0, 255],
            render_scale: 1.0,
        }
    }
}

impl AnnotatorConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`AnnotatorConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!("Loaded config from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    /// Check that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.saved_image_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "saved_image_name must not be empty".into(),
            ));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        check_fraction("canvas_fraction", self.canvas_fraction)?;
        check_fraction("min_size_fraction", self.min_size_fraction)?;
        check_fraction("max_size_fraction", self.max_size_fraction)?;
        if self.min_size_fraction > self.max_size_fraction {
            return Err(ConfigError::Invalid(format!(
                "min_size_fraction {} exceeds max_size_fraction {}",
                self.min_size_fraction, self.max_size_fraction
            )));
        }
        if !(0.0..=1.0).contains(&self.marker.alpha) {
            return Err(ConfigError::Invalid(format!(
                "marker.alpha must be 0-1, got {}",
                self.marker.alpha
            )));
        }
        if !(self.render_scale.is_finite() && self.render_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "render_scale must be positive, got {}",
                self.render_scale
            )));
        }
        Ok(())
    }

    /// Canvas area for a host view.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Layout`] if the host view is degenerate.
    pub fn canvas_bounds(&self, host: HostView) -> Result<CanvasBounds, ConfigError> {
        Ok(CanvasBounds::new(
            host.width * self.canvas_fraction,
            host.height * self.canvas_fraction,
        )?)
    }

    /// Marker size range for a host view width.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Layout`] if the derived range is invalid.
    pub fn size_config(&self, host: HostView) -> Result<SizeConfig, ConfigError> {
        Ok(SizeConfig::from_fractions(
            host.width,
            self.canvas_fraction,
            self.min_size_fraction,
            self.max_size_fraction,
        )?)
    }

    /// Compositor settings.
    #[must_use]
    pub fn composite_config(&self) -> CompositeConfig {
        CompositeConfig {
            background: self.background,
            scale: self.render_scale,
            style: self.marker,
        }
    }

    /// Encoding for the saved composite, from the file name extension.
    #[must_use]
    pub fn output_format(&self) -> ImageFormat {
        output_format_for(&self.saved_image_name)
    }

    /// File store writing `saved_image_name` inside `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriteFailed`](marker_core::StoreError::WriteFailed)
    /// if the directory cannot be created.
    pub fn file_store(&self, data_dir: impl AsRef<Path>) -> StoreResult<FileImageStore> {
        FileImageStore::with_file_name(data_dir.as_ref(), &self.saved_image_name)
    }
}

/// Encoding for a saved file name: PNG for `.png`, JPEG otherwise.
#[must_use]
pub fn output_format_for(file_name: &str) -> ImageFormat {
    match ImageFormat::from_file_name(file_name) {
        ImageFormat::Png => ImageFormat::Png,
        ImageFormat::Jpeg | ImageFormat::Unknown => ImageFormat::Jpeg,
    }
}

fn check_fraction(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be in (0, 1], got {value}"
        )))
    }
}
