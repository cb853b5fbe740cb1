//! Flattening the photo and the marker into one image.
//!
//! The output matches what the canvas shows: a `bounds`-sized surface filled
//! with the background, the photo aspect-fit and centered on it, and the
//! marker alpha-blended on top.

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use marker_core::{CanvasBounds, Compositor, MarkerGeometry, PixelBuffer};
use serde::{Deserialize, Serialize};

use crate::codec::to_rgba_image;
use crate::error::{RenderError, RenderResult};

/// Largest output edge, in pixels.
pub const MAX_OUTPUT_DIMENSION: u32 = 8192;

/// Shape drawn inside the marker's bounding square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    /// Disc inscribed in the bounding square.
    #[default]
    Circle,
    /// The full bounding square.
    Square,
}

/// Appearance of the marker overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    /// Fill colour (RGB).
    pub color: [u8; 3],
    /// Opacity from 0.0 (invisible) to 1.0 (opaque).
    pub alpha: f32,
    /// Shape of the filled region.
    pub shape: MarkerShape,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 255], // Cyan
            alpha: 0.5,
            shape: MarkerShape::Circle,
        }
    }
}

impl MarkerStyle {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rgba(&self) -> Rgba<u8> {
        let [r, g, b] = self.color;
        let a = (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([r, g, b, a])
    }
}

/// Configuration for compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeConfig {
    /// Background colour as RGBA bytes, visible around an aspect-fit photo.
    pub background: [u8; 4],
    /// Output pixels per canvas unit (e.g. 2.0 for retina).
    pub scale: f32,
    /// Marker appearance.
    pub style: MarkerStyle,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            background: [0, 0, 0, 255],
            scale: 1.0,
            style: MarkerStyle::default(),
        }
    }
}

/// Renders the image and marker into a single pixel buffer.
#[derive(Debug, Clone, Default)]
pub struct MarkerCompositor {
    config: CompositeConfig,
}

impl MarkerCompositor {
    /// Create a compositor with the given configuration.
    #[must_use]
    pub fn new(config: CompositeConfig) -> Self {
        Self { config }
    }

    /// Create a compositor with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// The compositor configuration.
    #[must_use]
    pub fn config(&self) -> &CompositeConfig {
        &self.config
    }

    /// Flatten `image` and `marker` as laid out in `bounds`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Resource`] if the output buffer cannot be built.
    pub fn render(
        &self,
        image: &PixelBuffer,
        marker: &MarkerGeometry,
        bounds: CanvasBounds,
    ) -> RenderResult<PixelBuffer> {
        let scale = output_scale(bounds, self.effective_scale());
        let (out_w, out_h) = output_dimensions(bounds, scale);

        let mut canvas = RgbaImage::from_pixel(out_w, out_h, Rgba(self.config.background));
        draw_aspect_fit(&mut canvas, &to_rgba_image(image)?);
        self.draw_marker(&mut canvas, marker, scale);

        tracing::debug!(out_w, out_h, ?marker, "Composited marker over image");
        Ok(PixelBuffer::new(out_w, out_h, canvas.into_raw())?)
    }

    fn effective_scale(&self) -> f32 {
        if self.config.scale.is_finite() && self.config.scale > 0.0 {
            self.config.scale
        } else {
            1.0
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn draw_marker(&self, canvas: &mut RgbaImage, marker: &MarkerGeometry, scale: f32) {
        let color = self.config.style.rgba();
        if color[3] == 0 {
            return;
        }

        let (left, top, size, _) = marker.rect();
        let (left, top, size) = (left * scale, top * scale, size * scale);
        let radius = size / 2.0;
        let (cx, cy) = (left + radius, top + radius);

        let x0 = left.floor().max(0.0) as u32;
        let y0 = top.floor().max(0.0) as u32;
        let x1 = ((left + size).ceil().max(0.0) as u32).min(canvas.width());
        let y1 = ((top + size).ceil().max(0.0) as u32).min(canvas.height());

        for y in y0..y1 {
            for x in x0..x1 {
                // Sample at the pixel center.
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let inside = match self.config.style.shape {
                    MarkerShape::Square => {
                        px >= left && px < left + size && py >= top && py < top + size
                    }
                    MarkerShape::Circle => {
                        let (dx, dy) = (px - cx, py - cy);
                        dx.mul_add(dx, dy * dy) <= radius * radius
                    }
                };
                if inside {
                    canvas.get_pixel_mut(x, y).blend(&color);
                }
            }
        }
    }
}

impl Compositor for MarkerCompositor {
    type Error = RenderError;

    fn composite(
        &self,
        image: &PixelBuffer,
        marker: &MarkerGeometry,
        bounds: CanvasBounds,
    ) -> RenderResult<PixelBuffer> {
        self.render(image, marker, bounds)
    }
}

/// Largest scale not above `requested` that keeps both edges of `bounds`
/// within [`MAX_OUTPUT_DIMENSION`]. One factor for both axes, so the
/// composite keeps the canvas aspect ratio.
#[allow(clippy::cast_precision_loss)]
fn output_scale(bounds: CanvasBounds, requested: f32) -> f32 {
    let max = MAX_OUTPUT_DIMENSION as f32;
    requested
        .min(max / bounds.width())
        .min(max / bounds.height())
}

/// Output size in pixels for `bounds` at `scale`, at least 1 and at most
/// [`MAX_OUTPUT_DIMENSION`] per edge.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn output_dimensions(bounds: CanvasBounds, scale: f32) -> (u32, u32) {
    let max = MAX_OUTPUT_DIMENSION as f32;
    let out_w = (bounds.width() * scale).round().clamp(1.0, max) as u32;
    let out_h = (bounds.height() * scale).round().clamp(1.0, max) as u32;
    (out_w, out_h)
}

/// Scale `photo` to fit inside `canvas` preserving aspect ratio, centered.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn draw_aspect_fit(canvas: &mut RgbaImage, photo: &RgbaImage) {
    let (cw, ch) = canvas.dimensions();
    let (pw, ph) = photo.dimensions();
    let fit = (cw as f32 / pw as f32).min(ch as f32 / ph as f32);
    let dw = ((pw as f32 * fit).round() as u32).clamp(1, cw);
    let dh = ((ph as f32 * fit).round() as u32).clamp(1, ch);

    let offset_x = i64::from((cw - dw) / 2);
    let offset_y = i64::from((ch - dh) / 2);

    if (dw, dh) == (pw, ph) {
        imageops::overlay(canvas, photo, offset_x, offset_y);
    } else {
        let resized = imageops::resize(photo, dw, dh, FilterType::Triangle);
        imageops::overlay(canvas, &resized, offset_x, offset_y);
    }
}
