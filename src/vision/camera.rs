//! Camera Capture
//!
//! Trait seam between the recognition loop and the physical camera, plus a
//! V4L2 capture backend behind the `v4l2` feature.
//!
//! The loop owns its frame source exclusively. Opening happens through a
//! [`CameraOpener`] so a failed open surfaces before the loop starts, and the
//! device is released when the boxed source is dropped on loop exit.

use crate::vision::frame::Frame;
use thiserror::Error;

/// Error types for camera capture
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Camera device could not be opened
    #[error("camera device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A single frame read failed; the loop skips the iteration
    #[error("frame read failed: {0}")]
    ReadFailed(String),

    /// Device produced a pixel format the pipeline cannot consume
    #[error("unsupported capture format: {0}")]
    UnsupportedFormat(String),
}

/// A source of camera frames
///
/// Implementations produce an effectively infinite sequence of frames at the
/// resolution the opener was asked for. A [`CaptureError::ReadFailed`] is
/// transient; callers are expected to skip the read and try again.
pub trait FrameSource: Send {
    /// Read the next frame
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;
}

/// Capability to open a camera device
///
/// Kept separate from [`FrameSource`] so the recognition loop can reopen the
/// device on every activation and report [`CaptureError::DeviceUnavailable`]
/// synchronously from `start()`.
pub trait CameraOpener: Send + Sync {
    /// Open the device at `device_index`, requesting the given capture
    /// resolution
    fn open(
        &self,
        device_index: u32,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn FrameSource>, CaptureError>;
}

#[cfg(feature = "v4l2")]
pub use self::v4l2::{V4l2Camera, V4l2Opener};

#[cfg(feature = "v4l2")]
mod v4l2 {
    use super::{CameraOpener, CaptureError, FrameSource};
    use crate::vision::frame::Frame;
    use std::time::Instant;
    use tracing::{debug, info};
    use v4l::buffer::Type;
    use v4l::io::traits::CaptureStream;
    use v4l::prelude::*;
    use v4l::video::Capture;
    use v4l::FourCC;

    /// V4L2 capture device producing RGB24 frames
    ///
    /// Negotiates YUYV with the driver and converts to RGB24 on read. The
    /// device node is held open for the lifetime of the value and released
    /// on drop.
    pub struct V4l2Camera {
        device: Device,
        width: u32,
        height: u32,
    }

    impl V4l2Camera {
        /// Open `/dev/video<index>` and negotiate the capture format
        pub fn open(device_index: u32, width: u32, height: u32) -> Result<Self, CaptureError> {
            info!(device_index, width, height, "opening V4L2 capture device");

            let device = Device::new(device_index as usize)
                .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

            let fourcc = FourCC::new(b"YUYV");
            let format = v4l::Format::new(width, height, fourcc);
            let negotiated = device
                .set_format(&format)
                .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

            if negotiated.fourcc != fourcc {
                return Err(CaptureError::UnsupportedFormat(format!(
                    "device negotiated {} instead of YUYV",
                    negotiated.fourcc
                )));
            }

            debug!(
                width = negotiated.width,
                height = negotiated.height,
                "V4L2 format negotiated"
            );

            Ok(Self {
                device,
                width: negotiated.width,
                height: negotiated.height,
            })
        }
    }

    impl FrameSource for V4l2Camera {
        fn read_frame(&mut self) -> Result<Frame, CaptureError> {
            let mut stream = MmapStream::with_buffers(&self.device, Type::VideoCapture, 1)
                .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;

            let (buffer, _meta) = stream
                .next()
                .map_err(|e| CaptureError::ReadFailed(e.to_string()))?;

            let expected = (self.width * self.height * 2) as usize;
            if buffer.len() < expected {
                return Err(CaptureError::ReadFailed(format!(
                    "short YUYV buffer: {} of {} bytes",
                    buffer.len(),
                    expected
                )));
            }

            let data = yuyv_to_rgb24(&buffer[..expected]);
            Ok(Frame::from_data(
                self.width,
                self.height,
                Instant::now(),
                data,
            ))
        }
    }

    /// Opener for V4L2 capture devices
    #[derive(Debug, Default, Clone, Copy)]
    pub struct V4l2Opener;

    impl CameraOpener for V4l2Opener {
        fn open(
            &self,
            device_index: u32,
            width: u32,
            height: u32,
        ) -> Result<Box<dyn FrameSource>, CaptureError> {
            Ok(Box::new(V4l2Camera::open(device_index, width, height)?))
        }
    }

    /// Convert a packed YUYV buffer to RGB24
    fn yuyv_to_rgb24(yuyv: &[u8]) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(yuyv.len() / 2 * 3);
        for chunk in yuyv.chunks_exact(4) {
            let (y0, u, y1, v) = (chunk[0], chunk[1], chunk[2], chunk[3]);
            push_rgb(&mut rgb, y0, u, v);
            push_rgb(&mut rgb, y1, u, v);
        }
        rgb
    }

    fn push_rgb(out: &mut Vec<u8>, y: u8, u: u8, v: u8) {
        let y = y as f32;
        let u = u as f32 - 128.0;
        let v = v as f32 - 128.0;

        let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
        let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
        let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;
        out.extend_from_slice(&[r, g, b]);
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    struct OneShotSource {
        served: bool,
    }

    impl FrameSource for OneShotSource {
        fn read_frame(&mut self) -> Result<Frame, CaptureError> {
            if self.served {
                Err(CaptureError::ReadFailed("exhausted".into()))
            } else {
                self.served = true;
                Ok(Frame::from_data(
                    2,
                    2,
                    Instant::now(),
                    vec![0u8; Frame::buffer_size(2, 2)],
                ))
            }
        }
    }

    #[test]
    fn test_read_failed_is_transient() {
        let mut source = OneShotSource { served: false };
        assert!(source.read_frame().is_ok());
        let err = source.read_frame().unwrap_err();
        assert!(matches!(err, CaptureError::ReadFailed(_)));
    }

    #[test]
    fn test_error_display() {
        let err = CaptureError::DeviceUnavailable("/dev/video0 busy".into());
        assert_eq!(err.to_string(), "camera device unavailable: /dev/video0 busy");
    }
}
