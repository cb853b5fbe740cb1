//! Owned RGBA pixel buffers.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// An RGBA8 image, row-major, without padding.
///
/// The core never inspects pixels; it only carries the buffer between the
/// capture source, the session and the compositor.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPixelBuffer`] if either dimension is zero
    /// or `data` is not exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidPixelBuffer(format!(
                "zero dimension {width}x{height}"
            )));
        }
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(CoreError::InvalidPixelBuffer(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer filled with a single colour.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPixelBuffer`] for zero or overflowing dimensions.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> CoreResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidPixelBuffer(format!(
                "zero dimension {width}x{height}"
            )));
        }
        let pixels = byte_len(width, height)? / BYTES_PER_PIXEL;
        Self::new(width, height, rgba.repeat(pixels))
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the raw RGBA bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The RGBA value at `(x, y)`, if in range.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = self.data.get(offset..offset + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Byte length of a `width` x `height` RGBA8 buffer.
fn byte_len(width: u32, height: u32) -> CoreResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| {
            CoreError::InvalidPixelBuffer(format!("dimensions overflow {width}x{height}"))
        })
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_matching_length() {
        let buffer = PixelBuffer::new(2, 3, vec![0; 24]).expect("valid buffer");
        assert_eq!(buffer.width(), 2);
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.as_bytes().len(), 24);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).expect_err("short buffer");
        assert!(matches!(err, CoreError::InvalidPixelBuffer(_)));
    }

    #[test]
    fn test_new_rejects_zero_dimension() {
        assert!(PixelBuffer::new(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn test_solid_fills_every_pixel() {
        let buffer = PixelBuffer::solid(3, 2, [1, 2, 3, 4]).expect("valid buffer");
        assert_eq!(buffer.pixel(0, 0), Some([1, 2, 3, 4]));
        assert_eq!(buffer.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(buffer.pixel(3, 0), None);
    }

    #[test]
    fn test_solid_rejects_overflowing_dimensions() {
        let err = PixelBuffer::solid(u32::MAX, u32::MAX, [0, 0, 0, 255])
            .expect_err("byte length overflows");
        assert!(matches!(err, CoreError::InvalidPixelBuffer(_)));
    }

    #[test]
    fn test_solid_rejects_zero_dimension() {
        let err = PixelBuffer::solid(0, 8, [0, 0, 0, 255]).expect_err("zero width");
        assert!(matches!(err, CoreError::InvalidPixelBuffer(_)));
    }

    #[test]
    fn test_debug_omits_pixel_data() {
        let buffer = PixelBuffer::solid(1, 1, [9, 9, 9, 9]).expect("valid buffer");
        assert_eq!(
            format!("{buffer:?}"),
            "PixelBuffer { width: 1, height: 1, bytes: 4 }"
        );
    }
}
