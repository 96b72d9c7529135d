//! Inference Seams
//!
//! Trait boundaries for the two machine-learning capabilities the pipeline
//! consumes but does not implement: hand pose extraction and gesture
//! classification. Both run on the recognition loop's thread; failures are
//! recovered locally ("no result this iteration") and never propagate to the
//! consumer.
//!
//! ## Vocabulary contract
//!
//! A classifier scores the fixed gesture vocabulary and its output indices
//! must follow [`crate::gesture::VOCABULARY`] order, the same order used at
//! training time. The argmax mapping from scores to a label lives in exactly
//! one place, [`Classification::from_scores`], and the recognizer verifies
//! [`GestureClassifier::vocabulary_size`] at activation so a mismatched model
//! fails to start instead of silently mislabeling gestures.

use crate::gesture::{GestureLabel, GESTURE_COUNT, VOCABULARY};
use crate::pose::{FeatureVector, HandPose};
use crate::vision::Frame;
use thiserror::Error;

/// Error types for inference capabilities
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Hand pose extraction failed for this frame
    #[error("hand extraction failed: {0}")]
    Extraction(String),

    /// Gesture classification failed for this feature vector
    #[error("classification failed: {0}")]
    Classification(String),
}

/// Maps a frame to zero or more hand poses
///
/// An empty result means no hands were detected. At most the first pose is
/// used for event purposes; additional hands are ignored.
pub trait HandPoseExtractor: Send {
    fn extract(&mut self, frame: &Frame) -> Result<Vec<HandPose>, InferenceError>;
}

/// Scores a feature vector over the fixed gesture vocabulary
pub trait GestureClassifier: Send {
    /// One score per gesture, indexed per [`crate::gesture::VOCABULARY`]
    fn scores(&self, features: &FeatureVector) -> Result<[f32; GESTURE_COUNT], InferenceError>;

    /// Number of classes the underlying model produces
    ///
    /// Checked against the vocabulary length when the recognizer starts.
    fn vocabulary_size(&self) -> usize {
        GESTURE_COUNT
    }
}

/// A classification result: the best-scoring label and its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: GestureLabel,
    pub confidence: f32,
}

impl Classification {
    /// Argmax over a score array in vocabulary order
    ///
    /// Ties resolve to the lowest index.
    pub fn from_scores(scores: &[f32; GESTURE_COUNT]) -> Self {
        let mut best = 0;
        for (i, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = i;
            }
        }
        Self {
            label: VOCABULARY[best],
            confidence: scores[best],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scores_argmax() {
        let mut scores = [0.01f32; GESTURE_COUNT];
        scores[GestureLabel::Next.index()] = 0.95;
        let c = Classification::from_scores(&scores);
        assert_eq!(c.label, GestureLabel::Next);
        assert_eq!(c.confidence, 0.95);
    }

    #[test]
    fn test_from_scores_tie_takes_lowest_index() {
        let mut scores = [0.0f32; GESTURE_COUNT];
        scores[GestureLabel::Pause.index()] = 0.5;
        scores[GestureLabel::Victory.index()] = 0.5;
        let c = Classification::from_scores(&scores);
        assert_eq!(c.label, GestureLabel::Pause);
    }

    #[test]
    fn test_from_scores_last_class() {
        let mut scores = [0.0f32; GESTURE_COUNT];
        scores[GESTURE_COUNT - 1] = 0.7;
        let c = Classification::from_scores(&scores);
        assert_eq!(c.label, GestureLabel::RockAndRoll);
    }
}
