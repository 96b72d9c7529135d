//! Motion Gate
//!
//! Cheap pre-filter deciding whether a frame changed enough from its
//! predecessor to warrant full pose extraction and classification. Skipping
//! static frames is the pipeline's primary cost control.
//!
//! The gate computes the per-pixel absolute difference of two frames,
//! reduces it to a luma plane, smooths it with a small binomial blur to
//! suppress sensor noise, thresholds the result into a binary mask, and
//! compares the mask sum against a cutoff.

use crate::vision::frame::Frame;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Tunables for the motion gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Luma difference above which a pixel counts as changed
    pub diff_threshold: u8,
    /// Mask sum above which the gate reports motion
    ///
    /// Each changed pixel contributes 255 to the sum, so the default of
    /// 10 000 corresponds to roughly 40 changed pixels.
    pub motion_cutoff: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            diff_threshold: 20,
            motion_cutoff: 10_000,
        }
    }
}

/// Motion detector over consecutive frames
#[derive(Debug, Clone)]
pub struct MotionGate {
    config: MotionConfig,
}

impl MotionGate {
    /// Create a gate with the given tunables
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// Report whether enough visual change occurred between two frames
    ///
    /// Frames of mismatched dimensions are treated as motion, since no
    /// meaningful comparison is possible.
    pub fn has_motion(&self, current: &Frame, previous: &Frame) -> bool {
        if current.width != previous.width || current.height != previous.height {
            return true;
        }

        let plane = absdiff(current, previous).luma();
        let blurred = binomial_blur(&plane, current.width as usize, current.height as usize);

        let mut mask_sum: u64 = 0;
        for &value in &blurred {
            if value > self.config.diff_threshold {
                mask_sum += 255;
            }
        }

        let motion = mask_sum > self.config.motion_cutoff;
        trace!(mask_sum, motion, "motion gate evaluated");
        motion
    }
}

/// Per-channel absolute difference of two same-sized frames
fn absdiff(a: &Frame, b: &Frame) -> Frame {
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(x, y)| x.abs_diff(*y))
        .collect();
    Frame::from_data(a.width, a.height, a.captured_at, data)
}

/// 5-tap separable binomial blur ([1, 4, 6, 4, 1] / 16), edge-clamped
fn binomial_blur(plane: &[u8], width: usize, height: usize) -> Vec<u8> {
    const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];

    let mut horizontal = vec![0u8; plane.len()];
    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            let mut acc = 0u32;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sx = (x as isize + k as isize - 2).clamp(0, width as isize - 1) as usize;
                acc += weight * plane[row + sx] as u32;
            }
            horizontal[row + x] = (acc / 16) as u8;
        }
    }

    let mut blurred = vec![0u8; plane.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u32;
            for (k, &weight) in KERNEL.iter().enumerate() {
                let sy = (y as isize + k as isize - 2).clamp(0, height as isize - 1) as usize;
                acc += weight * horizontal[sy * width + x] as u32;
            }
            blurred[y * width + x] = (acc / 16) as u8;
        }
    }

    blurred
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let mut frame = Frame::new(width, height);
        for pixel in frame.data.chunks_exact_mut(3) {
            pixel.copy_from_slice(&rgb);
        }
        frame
    }

    #[test]
    fn test_identical_frames_no_motion() {
        let gate = MotionGate::new(MotionConfig::default());
        let a = solid(160, 120, [90, 90, 90]);
        let b = a.clone();
        assert!(!gate.has_motion(&a, &b));
    }

    #[test]
    fn test_absdiff_reduces_through_frame_luma() {
        let a = solid(4, 4, [110, 120, 130]);
        let b = solid(4, 4, [100, 100, 100]);
        let plane = absdiff(&a, &b).luma();
        // (299*10 + 587*20 + 114*30) / 1000 = 18
        assert!(plane.iter().all(|&y| y == 18));
    }

    #[test]
    fn test_full_frame_change_is_motion() {
        let gate = MotionGate::new(MotionConfig::default());
        let black = solid(160, 120, [0, 0, 0]);
        let white = solid(160, 120, [255, 255, 255]);
        assert!(gate.has_motion(&white, &black));
    }

    #[test]
    fn test_small_difference_below_threshold() {
        // A uniform 10-step shift stays under the default diff threshold of 20
        let gate = MotionGate::new(MotionConfig::default());
        let a = solid(160, 120, [100, 100, 100]);
        let b = solid(160, 120, [110, 110, 110]);
        assert!(!gate.has_motion(&a, &b));
    }

    #[test]
    fn test_localized_change_under_cutoff() {
        // ~10 changed pixels contribute ~2550 to the mask sum, under 10 000
        let gate = MotionGate::new(MotionConfig::default());
        let a = solid(160, 120, [0, 0, 0]);
        let mut b = a.clone();
        for pixel in b.data.chunks_exact_mut(3).take(10) {
            pixel.copy_from_slice(&[255, 255, 255]);
        }
        assert!(!gate.has_motion(&b, &a));
    }

    #[test]
    fn test_cutoff_is_configurable() {
        let gate = MotionGate::new(MotionConfig {
            diff_threshold: 20,
            motion_cutoff: 255,
        });
        let a = solid(160, 120, [0, 0, 0]);
        let mut b = a.clone();
        // A 4x4 block of full-white pixels clears the lowered cutoff
        for y in 0..4usize {
            for x in 0..4usize {
                let idx = (y * 160 + x) * 3;
                b.data[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        assert!(gate.has_motion(&b, &a));
    }

    #[test]
    fn test_mismatched_dimensions_are_motion() {
        let gate = MotionGate::new(MotionConfig::default());
        let a = solid(160, 120, [0, 0, 0]);
        let b = solid(320, 240, [0, 0, 0]);
        assert!(gate.has_motion(&a, &b));
    }
}
