//! Debounce Dispatcher
//!
//! Pure state machine turning the stream of candidate gesture events into a
//! stream of accepted dispatches. No I/O: every call yields a decision, and
//! the caller forwards accepted events to the command sink.
//!
//! Two cooldown tiers apply after the confidence floor:
//!
//! - a **global** cooldown between any two acceptances, suppressing
//!   rapid-fire misclassification noise across all gestures;
//! - a stricter **per-label** cooldown for toggle-style gestures (Thumb Up
//!   flips repeat mode), so a single lingering hand cannot flip the toggle
//!   twice.
//!
//! State lives in the dispatcher instance and is constructed fresh for each
//! loop activation; there is no ambient global state.

use crate::gesture::{GestureEvent, GestureLabel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tunables for the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Events below this confidence are never dispatched
    pub confidence_floor: f32,
    /// Minimum time between any two accepted events
    pub global_cooldown: Duration,
    /// Stricter per-gesture cooldowns, on top of the global one
    pub label_cooldowns: HashMap<GestureLabel, Duration>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        let mut label_cooldowns = HashMap::new();
        label_cooldowns.insert(GestureLabel::ThumbUp, Duration::from_secs(2));

        Self {
            confidence_floor: 0.8,
            global_cooldown: Duration::from_millis(500),
            label_cooldowns,
        }
    }
}

/// Why an event was not dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Confidence under the floor
    BelowConfidence,
    /// Global cooldown since the last acceptance has not elapsed
    GlobalCooldown,
    /// The label's own cooldown has not elapsed
    LabelCooldown,
}

/// Decision for a single candidate event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchDecision {
    Accepted,
    Rejected(RejectReason),
}

impl DispatchDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DispatchDecision::Accepted)
    }
}

/// Debounce state machine
///
/// Only ever invoked from the recognition loop's thread, so it carries no
/// locking of its own.
#[derive(Debug)]
pub struct DebounceDispatcher {
    config: DebounceConfig,
    last_global: Option<Instant>,
    last_by_label: HashMap<GestureLabel, Instant>,
}

impl DebounceDispatcher {
    /// Create a dispatcher with cleared state
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            last_global: None,
            last_by_label: HashMap::new(),
        }
    }

    /// Decide whether an event is dispatched, mutating cooldown state on
    /// acceptance
    ///
    /// Rules apply in order: confidence floor, global cooldown, label
    /// cooldown. Rejected events leave the state untouched.
    pub fn consider(&mut self, event: &GestureEvent) -> DispatchDecision {
        // NaN confidence must fail the floor, not slip past it
        if event.confidence.is_nan() || event.confidence < self.config.confidence_floor {
            return DispatchDecision::Rejected(RejectReason::BelowConfidence);
        }

        if let Some(last) = self.last_global {
            if event.observed_at.saturating_duration_since(last) < self.config.global_cooldown {
                return DispatchDecision::Rejected(RejectReason::GlobalCooldown);
            }
        }

        if let Some(cooldown) = self.config.label_cooldowns.get(&event.label) {
            if let Some(last) = self.last_by_label.get(&event.label) {
                if event.observed_at.saturating_duration_since(*last) < *cooldown {
                    return DispatchDecision::Rejected(RejectReason::LabelCooldown);
                }
            }
        }

        self.last_global = Some(event.observed_at);
        self.last_by_label.insert(event.label, event.observed_at);
        DispatchDecision::Accepted
    }

    /// Clear all cooldown state, as on loop (re)start
    pub fn reset(&mut self) {
        self.last_global = None;
        self.last_by_label.clear();
    }
}
