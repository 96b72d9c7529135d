//! Frame Types
//!
//! Defines the RGB frame buffer flowing through the sensing pipeline.
//! Frames are ephemeral: each pipeline stage owns the frame it is currently
//! processing, and at most one previous frame is retained for motion gating.

use std::time::Instant;

/// Bytes per pixel for RGB24
pub const RGB24_BYTES_PER_PIXEL: usize = 3;

/// A captured camera frame in RGB24
///
/// Row-major, tightly packed, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// When the frame was captured
    pub captured_at: Instant,
    /// Pixel data, `width * height * 3` bytes
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a zeroed frame with an allocated buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            captured_at: Instant::now(),
            data: vec![0u8; Self::buffer_size(width, height)],
        }
    }

    /// Create a frame from existing RGB24 data
    pub fn from_data(width: u32, height: u32, captured_at: Instant, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), Self::buffer_size(width, height));
        Self {
            width,
            height,
            captured_at,
            data,
        }
    }

    /// Buffer size in bytes for an RGB24 frame
    pub fn buffer_size(width: u32, height: u32) -> usize {
        width as usize * height as usize * RGB24_BYTES_PER_PIXEL
    }

    /// Number of pixels in the frame
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Extract the luma (intensity) plane, one byte per pixel
    ///
    /// Uses the ITU-R BT.601 weights in integer arithmetic.
    pub fn luma(&self) -> Vec<u8> {
        let mut plane = Vec::with_capacity(self.pixel_count());
        for rgb in self.data.chunks_exact(RGB24_BYTES_PER_PIXEL) {
            let y = (299 * rgb[0] as u32 + 587 * rgb[1] as u32 + 114 * rgb[2] as u32) / 1000;
            plane.push(y as u8);
        }
        plane
    }

    /// Downscale to the given resolution with nearest-neighbor sampling
    ///
    /// Returns a copy when the target matches the current resolution.
    pub fn downscale(&self, width: u32, height: u32) -> Frame {
        if width == self.width && height == self.height {
            return self.clone();
        }

        let mut data = Vec::with_capacity(Self::buffer_size(width, height));
        let src_width = self.width as usize;

        for y in 0..height as usize {
            let src_y = y * self.height as usize / height as usize;
            for x in 0..width as usize {
                let src_x = x * src_width / width as usize;
                let idx = (src_y * src_width + src_x) * RGB24_BYTES_PER_PIXEL;
                data.extend_from_slice(&self.data[idx..idx + RGB24_BYTES_PER_PIXEL]);
            }
        }

        Frame::from_data(width, height, self.captured_at, data)
    }
}
