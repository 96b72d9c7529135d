//! Vision Module
//!
//! Frame capture and the cheap per-frame processing that happens before any
//! machine-learning inference:
//!
//! ```text
//! Camera → Frame (RGB24) → downscale → MotionGate → pose extraction …
//! ```
//!
//! The [`camera::V4l2Camera`] backend requires the `v4l2` feature:
//!
//! ```toml
//! handwave-core = { version = "0.1", features = ["v4l2"] }
//! ```

pub mod camera;
pub mod frame;
pub mod motion;

pub use camera::{CameraOpener, CaptureError, FrameSource};
pub use frame::Frame;
pub use motion::{MotionConfig, MotionGate};

#[cfg(feature = "v4l2")]
pub use camera::{V4l2Camera, V4l2Opener};
