//! Control Channel
//!
//! The boundary between the background recognition loop and the
//! single-threaded command consumer. Accepted events cross this boundary as
//! messages on an unbounded channel and are replayed on the consumer's own
//! task, never on the loop's thread: the sink mutates playback/UI state that
//! only its own execution context may touch.
//!
//! Ordering is FIFO: events arrive in the order the dispatcher accepted
//! them, with no reordering or coalescing (coalescing already happened via
//! cooldowns). The queue is unbounded, which is acceptable because
//! acceptance is rate-limited to at most one event per global cooldown
//! window.

use crate::gesture::GestureEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

/// The stateful consumer of accepted gesture events
///
/// Implementations must treat every dispatch as idempotent-safe to ignore:
/// "Pause" while already paused is a no-op, not an error.
#[async_trait]
pub trait CommandSink: Send {
    /// Handle one accepted gesture event
    async fn dispatch(&mut self, event: GestureEvent);
}

/// Forward accepted events from the control channel into a sink
///
/// Runs until the sending side (the recognition loop) is dropped. Spawn this
/// on the consumer's task:
///
/// ```rust,ignore
/// let receiver = recognizer.start().await?;
/// tokio::spawn(async move {
///     pump_events(receiver, &mut player).await;
/// });
/// ```
pub async fn pump_events<S: CommandSink>(
    mut receiver: mpsc::UnboundedReceiver<GestureEvent>,
    sink: &mut S,
) {
    while let Some(event) = receiver.recv().await {
        debug!(label = %event.label, "delivering gesture event to sink");
        sink.dispatch(event).await;
    }
    debug!("control channel closed, event pump finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureLabel;

    #[derive(Default)]
    struct RecordingSink {
        seen: Vec<GestureLabel>,
    }

    #[async_trait]
    impl CommandSink for RecordingSink {
        async fn dispatch(&mut self, event: GestureEvent) {
            self.seen.push(event.label);
        }
    }

    #[tokio::test]
    async fn test_pump_preserves_fifo_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        let labels = [
            GestureLabel::Play,
            GestureLabel::Next,
            GestureLabel::VolumeDown,
        ];
        for label in labels {
            tx.send(GestureEvent::new(label, 0.9)).unwrap();
        }
        drop(tx);

        let mut sink = RecordingSink::default();
        pump_events(rx, &mut sink).await;
        assert_eq!(sink.seen, labels);
    }

    #[tokio::test]
    async fn test_pump_finishes_when_sender_dropped() {
        let (tx, rx) = mpsc::unbounded_channel::<GestureEvent>();
        drop(tx);

        let mut sink = RecordingSink::default();
        pump_events(rx, &mut sink).await;
        assert!(sink.seen.is_empty());
    }
}
