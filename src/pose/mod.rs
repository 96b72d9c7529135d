//! Hand Pose and Feature Vector Types
//!
//! A detected hand is an ordered set of exactly [`LANDMARK_COUNT`] 3-D
//! landmarks in normalized frame coordinates. Classification consumes the
//! pose flattened into a [`FeatureVector`] of [`FEATURE_LEN`] values in
//! landmark-major order: landmark 0's x, y, z, then landmark 1's x, y, z,
//! and so on. That order is the classifier's input contract and must match
//! the order used at training time.

use thiserror::Error;

/// Number of tracked landmarks per hand
pub const LANDMARK_COUNT: usize = 21;

/// Length of the flattened feature vector (21 landmarks x 3 coordinates)
pub const FEATURE_LEN: usize = LANDMARK_COUNT * 3;

/// Error types for pose construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoseError {
    /// A pose must have exactly [`LANDMARK_COUNT`] landmarks
    #[error("expected {LANDMARK_COUNT} landmarks, got {0}")]
    WrongLandmarkCount(usize),
}

/// A single tracked point on a hand, in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// The full ordered landmark set for one detected hand in one frame
///
/// Produced per detected hand per frame and discarded after feature
/// extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandPose {
    /// Build a pose from exactly [`LANDMARK_COUNT`] landmarks
    pub fn from_landmarks(landmarks: Vec<Landmark>) -> Result<Self, PoseError> {
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks
            .try_into()
            .map_err(|v: Vec<Landmark>| PoseError::WrongLandmarkCount(v.len()))?;
        Ok(Self { landmarks })
    }

    /// All landmarks in canonical index order
    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Landmark at the given canonical index, or `None` past
    /// [`LANDMARK_COUNT`]
    pub fn landmark(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied()
    }
}

/// Flattened numeric encoding of a hand pose
///
/// Invariant: always [`FEATURE_LEN`] values, in landmark-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f32; FEATURE_LEN],
}

impl FeatureVector {
    /// Flatten a pose into a feature vector
    pub fn from_pose(pose: &HandPose) -> Self {
        let mut values = [0.0f32; FEATURE_LEN];
        for (i, landmark) in pose.landmarks().iter().enumerate() {
            values[i * 3] = landmark.x;
            values[i * 3 + 1] = landmark.y;
            values[i * 3 + 2] = landmark.z;
        }
        Self { values }
    }

    /// The flattened values
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Always [`FEATURE_LEN`]
    pub fn len(&self) -> usize {
        FEATURE_LEN
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<&HandPose> for FeatureVector {
    fn from(pose: &HandPose) -> Self {
        Self::from_pose(pose)
    }
}
