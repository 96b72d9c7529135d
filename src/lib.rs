//! handwave-core
//!
//! Gesture-sensing and dispatch core for camera-driven media control.
//!
//! ## Architecture
//!
//! A background sampling loop reads camera frames, gates them by motion,
//! turns detected hand poses into feature vectors, classifies them into a
//! closed gesture vocabulary, and delivers debounced command events to a
//! single-threaded consumer:
//!
//! ```text
//! Camera → MotionGate → HandPoseExtractor → FeatureVector → GestureClassifier
//!                                                                 ↓
//!                     CommandSink ← ControlChannel ← DebounceDispatcher
//! ```
//!
//! ### Modules
//!
//! - `vision`: frame buffers, motion gating, camera capture seam
//! - `pose`: hand landmarks and feature vectors
//! - `infer`: extractor/classifier trait seams
//! - `gesture`: gesture vocabulary, media commands, events
//! - `dispatch`: debounce/cooldown state machine
//! - `recognizer`: the background recognition loop
//! - `control`: event delivery to the command sink
//!
//! ## Example
//!
//! ```rust,ignore
//! use handwave_core::{GestureRecognizer, RecognizerConfig, pump_events};
//!
//! let mut recognizer = GestureRecognizer::new(
//!     RecognizerConfig::default(),
//!     Box::new(camera_opener),
//!     pose_extractor,
//!     gesture_classifier,
//! );
//!
//! let events = recognizer.start().await?;
//! tokio::spawn(async move { pump_events(events, &mut player).await });
//!
//! // later, from the control thread
//! recognizer.stop().await?;
//! ```

// Re-export commonly used types
pub use control::{pump_events, CommandSink};
pub use dispatch::{DebounceConfig, DebounceDispatcher, DispatchDecision, RejectReason};
pub use error::{Error, Result};
pub use gesture::{GestureEvent, GestureLabel, MediaCommand, GESTURE_COUNT, VOCABULARY};
pub use infer::{Classification, GestureClassifier, HandPoseExtractor};
pub use pose::{FeatureVector, HandPose, Landmark, FEATURE_LEN, LANDMARK_COUNT};
pub use recognizer::{GestureRecognizer, RecognizerConfig, RecognizerError, RecognizerStats};
pub use vision::{CameraOpener, CaptureError, Frame, FrameSource, MotionConfig, MotionGate};

// Public modules
pub mod control;
pub mod dispatch;
pub mod error;
pub mod gesture;
pub mod infer;
pub mod pose;
pub mod recognizer;
pub mod vision;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_feature_len_matches_vocabulary_shape() {
        assert_eq!(FEATURE_LEN, LANDMARK_COUNT * 3);
        assert_eq!(VOCABULARY.len(), GESTURE_COUNT);
    }
}
