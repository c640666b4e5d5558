use crate::{CoreResult, ScanError};

use std::panic::Location;

use error_location::ErrorLocation;
use image::GrayImage;

/// 8-bit luma pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl GrayFrame {
    /// Wrap a pixel buffer, checking its length against the dimensions.
    #[track_caller]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> CoreResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ScanError::Decode {
                reason: format!(
                    "Frame buffer holds {} bytes, expected {} for {}x{}",
                    pixels.len(),
                    expected,
                    width,
                    height
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True for a zero-sized frame.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Luma value at `(x, y)`. Out-of-range coordinates read as white.
    pub fn luma(&self, x: usize, y: usize) -> u8 {
        if x >= self.width as usize {
            return u8::MAX;
        }
        self.pixels
            .get(y * self.width as usize + x)
            .copied()
            .unwrap_or(u8::MAX)
    }
}

impl From<GrayImage> for GrayFrame {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}
