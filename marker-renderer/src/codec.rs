//! Encoding composites for storage and decoding stored images.

use std::io::Cursor;

use image::{DynamicImage, ImageEncoder, RgbaImage};
use marker_core::PixelBuffer;

use crate::error::{RenderError, RenderResult};

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 50;

/// Supported stored image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            _ => Self::Unknown,
        }
    }

    /// Detect format from the extension of a file name.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Unknown, Self::from_extension)
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        Self::Unknown
    }
}

/// Decode stored bytes into an RGBA pixel buffer.
///
/// # Errors
///
/// Returns [`RenderError::Decode`] if the bytes are not a decodable image.
pub fn decode_image(data: &[u8]) -> RenderResult<PixelBuffer> {
    let format = ImageFormat::from_magic_bytes(data);

    let img = image::load_from_memory(data).map_err(|e| RenderError::Decode(e.to_string()))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!(?format, width, height, "Decoded stored image");

    Ok(PixelBuffer::new(width, height, rgba.into_raw())?)
}

/// Encode a buffer in the given format. Unknown formats fall back to JPEG.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if encoding fails.
pub fn encode(buffer: &PixelBuffer, format: ImageFormat, jpeg_quality: u8) -> RenderResult<Vec<u8>> {
    match format {
        ImageFormat::Png => encode_png(buffer),
        ImageFormat::Jpeg | ImageFormat::Unknown => encode_jpeg(buffer, jpeg_quality),
    }
}

/// Encode a buffer as JPEG. Alpha is discarded; quality is clamped to 1-100.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if encoding fails.
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> RenderResult<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(to_rgba_image(buffer)?).to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut buf = Cursor::new(Vec::new());
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder
        .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::Encode(format!("JPEG encoding failed: {e}")))?;

    Ok(buf.into_inner())
}

/// Encode a buffer as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if encoding fails.
pub fn encode_png(buffer: &PixelBuffer) -> RenderResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(to_rgba_image(buffer)?)
        .write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Copy a pixel buffer into an `image` RGBA buffer.
pub(crate) fn to_rgba_image(buffer: &PixelBuffer) -> RenderResult<RgbaImage> {
    RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_bytes().to_vec())
        .ok_or_else(|| RenderError::Resource("pixel buffer size mismatch".to_string()))
}
