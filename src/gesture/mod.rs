//! Gesture vocabulary and event types
//!
//! Defines the closed set of gestures the classifier is trained on, the
//! media command each gesture maps to, and the event type that flows from
//! the recognition loop to the command sink.
//!
//! The variant order of [`GestureLabel`] is the classifier's output index
//! mapping. It must match the order the model was trained with; see
//! [`VOCABULARY`] and [`GestureLabel::index`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Number of gestures in the vocabulary
pub const GESTURE_COUNT: usize = 9;

/// A recognized hand gesture
///
/// Declaration order defines the classifier output index: `Play` is class 0,
/// `RockAndRoll` is class 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureLabel {
    Play,
    Pause,
    Next,
    Previous,
    #[serde(rename = "Volume Up")]
    VolumeUp,
    #[serde(rename = "Volume Down")]
    VolumeDown,
    Victory,
    #[serde(rename = "Thumb Up")]
    ThumbUp,
    #[serde(rename = "Rock and Roll")]
    RockAndRoll,
}

/// The gesture vocabulary in classifier index order
pub const VOCABULARY: [GestureLabel; GESTURE_COUNT] = [
    GestureLabel::Play,
    GestureLabel::Pause,
    GestureLabel::Next,
    GestureLabel::Previous,
    GestureLabel::VolumeUp,
    GestureLabel::VolumeDown,
    GestureLabel::Victory,
    GestureLabel::ThumbUp,
    GestureLabel::RockAndRoll,
];

impl GestureLabel {
    /// Classifier output index for this gesture
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a gesture by classifier output index
    pub fn from_index(index: usize) -> Option<Self> {
        VOCABULARY.get(index).copied()
    }

    /// Human-readable name, matching the training dataset directory names
    pub fn name(self) -> &'static str {
        match self {
            GestureLabel::Play => "Play",
            GestureLabel::Pause => "Pause",
            GestureLabel::Next => "Next",
            GestureLabel::Previous => "Previous",
            GestureLabel::VolumeUp => "Volume Up",
            GestureLabel::VolumeDown => "Volume Down",
            GestureLabel::Victory => "Victory",
            GestureLabel::ThumbUp => "Thumb Up",
            GestureLabel::RockAndRoll => "Rock and Roll",
        }
    }

    /// Media command this gesture triggers
    ///
    /// The mapping is exhaustive: adding a gesture variant without a command
    /// is a compile error.
    pub fn command(self) -> MediaCommand {
        match self {
            GestureLabel::Play => MediaCommand::Play,
            GestureLabel::Pause => MediaCommand::Pause,
            GestureLabel::Next => MediaCommand::NextTrack,
            GestureLabel::Previous => MediaCommand::PreviousTrack,
            GestureLabel::VolumeUp => MediaCommand::VolumeUp,
            GestureLabel::VolumeDown => MediaCommand::VolumeDown,
            GestureLabel::Victory => MediaCommand::Stop,
            GestureLabel::ThumbUp => MediaCommand::ToggleRepeat,
            GestureLabel::RockAndRoll => MediaCommand::Quit,
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Media transport command produced by an accepted gesture
///
/// The consumer must treat commands as idempotent-safe: `Pause` while already
/// paused is a no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaCommand {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    Stop,
    ToggleRepeat,
    Quit,
}

/// A single gesture observation produced by the recognition loop
///
/// Created once per frame that yields a hand pose and consumed exactly once
/// by the debounce dispatcher. Confidence is in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct GestureEvent {
    /// The recognized gesture
    pub label: GestureLabel,
    /// Classifier confidence for the label
    pub confidence: f32,
    /// When the frame that produced this event was processed
    pub observed_at: Instant,
}

impl GestureEvent {
    /// Create an event observed now
    pub fn new(label: GestureLabel, confidence: f32) -> Self {
        Self::observed(label, confidence, Instant::now())
    }

    /// Create an event with an explicit observation time
    pub fn observed(label: GestureLabel, confidence: f32, observed_at: Instant) -> Self {
        Self {
            label,
            confidence,
            observed_at,
        }
    }

    /// Media command this event maps to
    pub fn command(&self) -> MediaCommand {
        self.label.command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_index_round_trip() {
        for (i, label) in VOCABULARY.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(GestureLabel::from_index(i), Some(*label));
        }
        assert_eq!(GestureLabel::from_index(GESTURE_COUNT), None);
    }

    #[test]
    fn test_vocabulary_order_matches_training() {
        let names: Vec<&str> = VOCABULARY.iter().map(|l| l.name()).collect();
        assert_eq!(
            names,
            vec![
                "Play",
                "Pause",
                "Next",
                "Previous",
                "Volume Up",
                "Volume Down",
                "Victory",
                "Thumb Up",
                "Rock and Roll",
            ]
        );
    }

    #[test]
    fn test_command_mapping() {
        assert_eq!(GestureLabel::Victory.command(), MediaCommand::Stop);
        assert_eq!(GestureLabel::ThumbUp.command(), MediaCommand::ToggleRepeat);
        assert_eq!(GestureLabel::RockAndRoll.command(), MediaCommand::Quit);
        assert_eq!(GestureLabel::Next.command(), MediaCommand::NextTrack);
    }

    #[test]
    fn test_event_command() {
        let event = GestureEvent::new(GestureLabel::VolumeUp, 0.9);
        assert_eq!(event.command(), MediaCommand::VolumeUp);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(GestureLabel::RockAndRoll.to_string(), "Rock and Roll");
        assert_eq!(GestureLabel::Play.to_string(), "Play");
    }
}
