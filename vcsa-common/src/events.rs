//! Event types for the VCSA event system
//!
//! Provides the shared event definitions and EventBus used to fan out live
//! analysis progress to SSE subscribers. Emission is fire-and-forget: a slow
//! or absent subscriber never blocks or fails the emitting pipeline.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// VCSA event types
///
/// Events are broadcast via [`EventBus`] and serialized for SSE transmission.
/// One analysis request produces `AnalysisStarted`, zero or more
/// `CommentScored`, and exactly one of `AnalysisCompleted` / `AnalysisFailed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VcsaEvent {
    /// An analysis request entered the pipeline
    AnalysisStarted {
        /// Dispatcher-assigned request identifier
        request_id: Uuid,
        /// Video whose comments are being analyzed
        video_id: String,
        /// When processing started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A single comment was scored
    ///
    /// Emitted immediately after the comment is folded into the running
    /// aggregates, in source order.
    CommentScored {
        /// Dispatcher-assigned request identifier
        request_id: Uuid,
        /// Video the comment belongs to
        video_id: String,
        /// 0-based position of the comment in the source sequence
        index: usize,
        /// Comment text
        text: String,
        /// Classifier label (true = positive)
        label: bool,
        /// Classifier confidence score (signed margin)
        score: f64,
        /// When the comment was scored
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An analysis request finished successfully
    AnalysisCompleted {
        /// Dispatcher-assigned request identifier
        request_id: Uuid,
        /// Video that was analyzed
        video_id: String,
        /// Number of comments scored
        count: usize,
        /// Mean score across all scored comments (None when count == 0)
        average_score: Option<f64>,
        /// When processing finished
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An analysis request failed
    AnalysisFailed {
        /// Dispatcher-assigned request identifier
        request_id: Uuid,
        /// Video that was being analyzed
        video_id: String,
        /// Human-readable failure description
        error: String,
        /// When the failure was detected
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl VcsaEvent {
    /// SSE event name for this variant
    pub fn event_name(&self) -> &'static str {
        match self {
            VcsaEvent::AnalysisStarted { .. } => "AnalysisStarted",
            VcsaEvent::CommentScored { .. } => "CommentScored",
            VcsaEvent::AnalysisCompleted { .. } => "AnalysisCompleted",
            VcsaEvent::AnalysisFailed { .. } => "AnalysisFailed",
        }
    }
}

/// Broadcast bus for [`VcsaEvent`]
///
/// Thin wrapper over `tokio::sync::broadcast`. Cloning is cheap; all clones
/// share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<VcsaEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    ///
    /// Older events are dropped for lagging subscribers once the buffer
    /// fills; the emitter is never blocked.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<VcsaEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Analysis progress events are advisory; it is acceptable for no
    /// component to be listening.
    pub fn emit_lossy(&self, event: VcsaEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(video_id: &str) -> VcsaEvent {
        VcsaEvent::AnalysisStarted {
            request_id: Uuid::new_v4(),
            video_id: video_id.to_string(),
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn emit_without_subscribers_is_a_noop() {
        let bus = EventBus::new(16);
        // Must not panic or error
        bus.emit_lossy(started("abc123"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_emitted_event() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit_lossy(started("abc123"));

        let event = rx.recv().await.expect("event");
        match event {
            VcsaEvent::AnalysisStarted { video_id, .. } => assert_eq!(video_id, "abc123"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_value(started("v1")).unwrap();
        assert_eq!(json["type"], "AnalysisStarted");
        assert_eq!(json["video_id"], "v1");
    }
}
