//! Error types for handwave-core

use thiserror::Error;

/// Result type alias using the crate-level [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error aggregating the per-area error types
///
/// Taxonomy: a failed camera open ([`crate::vision::CaptureError::DeviceUnavailable`])
/// is fatal to the `start()` that encountered it; everything else in the
/// pipeline is recovered locally and only surfaces through logs and stats.
#[derive(Debug, Error)]
pub enum Error {
    /// Camera capture error
    #[error(transparent)]
    Capture(#[from] crate::vision::CaptureError),

    /// Hand extraction or classification error
    #[error(transparent)]
    Inference(#[from] crate::infer::InferenceError),

    /// Invalid hand pose data
    #[error(transparent)]
    Pose(#[from] crate::pose::PoseError),

    /// Recognizer lifecycle error
    #[error(transparent)]
    Recognizer(#[from] crate::recognizer::RecognizerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::RecognizerError;

    #[test]
    fn test_error_conversion() {
        let err: Error = RecognizerError::AlreadyRunning.into();
        assert!(matches!(err, Error::Recognizer(_)));
        assert_eq!(err.to_string(), "gesture recognizer is already running");
    }
}
