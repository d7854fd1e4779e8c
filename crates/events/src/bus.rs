//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use devflow_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event names published by the API.
pub mod event_types {
    pub const QUESTION_CREATED: &str = "question.created";
    pub const QUESTION_UPDATED: &str = "question.updated";
    pub const QUESTION_DELETED: &str = "question.deleted";
    pub const QUESTION_VIEWED: &str = "question.viewed";
    pub const QUESTION_SAVED_TOGGLED: &str = "question.saved_toggled";
    pub const ANSWER_CREATED: &str = "answer.created";
    pub const VOTE_APPLIED: &str = "vote.applied";
    pub const USER_CREATED: &str = "user.created";
    pub const USER_UPDATED: &str = "user.updated";
    pub const USER_DELETED: &str = "user.deleted";
}

// ---------------------------------------------------------------------------
// ForumEvent
// ---------------------------------------------------------------------------

/// Something that changed in the store.
///
/// Built with [`ForumEvent::new`] and the `with_*` builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumEvent {
    /// Dot-separated event name, e.g. `"question.created"`.
    pub event_type: String,

    /// Source entity kind (e.g. `"question"`, `"answer"`).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DbId>,

    /// Internal id of the user that caused the event.
    pub actor_user_id: Option<DbId>,

    /// Presentation-layer view to refresh. Opaque to the store.
    pub revalidate_path: Option<String>,

    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl ForumEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            revalidate_path: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<DbId>,
    ) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id.into());
        self
    }

    pub fn with_actor(mut self, user_id: impl Into<DbId>) -> Self {
        self.actor_user_id = Some(user_id.into());
        self
    }

    /// Attach the caller's revalidation hint. Blank paths are dropped.
    pub fn with_revalidate_path(mut self, path: Option<impl Into<String>>) -> Self {
        self.revalidate_path = path
            .map(Into::into)
            .filter(|p: &String| !p.trim().is_empty());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
pub struct EventBus {
    sender: broadcast::Sender<ForumEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread events are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped if there are none.
    pub fn publish(&self, event: ForumEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ForumEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers. Dropped receivers stop counting immediately.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use devflow_core::types::QuestionId;

    use super::*;

    #[tokio::test]
    async fn subscriber_receives_enriched_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let question = QuestionId::new(42).unwrap();
        bus.publish(
            ForumEvent::new(event_types::QUESTION_CREATED)
                .with_source("question", question)
                .with_actor(7)
                .with_revalidate_path(Some("/"))
                .with_payload(serde_json::json!({"title": "Lifetimes"})),
        );

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type, "question.created");
        assert_eq!(received.source_entity_type.as_deref(), Some("question"));
        assert_eq!(received.source_entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.revalidate_path.as_deref(), Some("/"));
        assert_eq!(received.payload["title"], "Lifetimes");
    }

    #[tokio::test]
    async fn every_subscriber_sees_each_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ForumEvent::new(event_types::VOTE_APPLIED));

        assert_eq!(rx1.recv().await.unwrap().event_type, "vote.applied");
        assert_eq!(rx2.recv().await.unwrap().event_type, "vote.applied");
    }

    #[test]
    fn subscriber_count_tracks_live_receivers() {
        let bus = EventBus::default();
        assert_eq!(bus.subscriber_count(), 0);

        let rx1 = bus.subscribe();
        let rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
        drop(rx2);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        EventBus::default().publish(ForumEvent::new(event_types::QUESTION_VIEWED));
    }

    #[test]
    fn blank_revalidate_path_is_dropped() {
        let event = ForumEvent::new(event_types::QUESTION_UPDATED);
        let blank = event.clone().with_revalidate_path(Some("  "));
        assert!(blank.revalidate_path.is_none());

        let event = event.with_revalidate_path(None::<String>);
        assert!(event.revalidate_path.is_none());
        assert!(event.payload.is_object());
    }
}
