//! Camera frame types
//!
//! Defines the RGB frame buffer handed from the frame source to the detector.

use crate::error::{PilotError, Result};
use std::fmt;

/// Pixel format for camera frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// RGB24 (8 bits per channel, packed) - the detector input format
    Rgb24,
    /// RGBA32 (8 bits per channel with alpha, packed)
    Rgba32,
}

impl PixelFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb24 => 3,
            PixelFormat::Rgba32 => 4,
        }
    }

    /// Calculate the buffer size needed for a frame
    pub fn buffer_size(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Rgb24 => write!(f, "RGB24"),
            PixelFormat::Rgba32 => write!(f, "RGBA32"),
        }
    }
}

/// A captured camera frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: PixelFormat,
    /// Packed pixel data, row-major
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a frame, validating the buffer against the declared dimensions
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = format.buffer_size(width, height);
        if data.len() != expected {
            return Err(PilotError::invalid_frame(format!(
                "buffer is {} bytes, expected {} for {}x{} {}",
                data.len(),
                expected,
                width,
                height,
                format
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Create an all-black RGB24 frame
    pub fn black(width: u32, height: u32) -> Self {
        let format = PixelFormat::Rgb24;
        Self {
            width,
            height,
            format,
            data: vec![0; format.buffer_size(width, height)],
        }
    }

    /// Mirror the frame horizontally, in place
    ///
    /// The feed is presented to the operator as a mirror, so every frame is
    /// flipped along the vertical axis before detection.
    pub fn flip_horizontal(&mut self) {
        let bpp = self.format.bytes_per_pixel();
        let row_len = self.width as usize * bpp;
        for row in self.data.chunks_exact_mut(row_len) {
            let width = row.len() / bpp;
            for x in 0..width / 2 {
                let left = x * bpp;
                let right = (width - 1 - x) * bpp;
                for b in 0..bpp {
                    row.swap(left + b, right + b);
                }
            }
        }
    }
}
