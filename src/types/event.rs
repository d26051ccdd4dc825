//! Queue events
//!
//! Events are immutable facts about a queue: something was enqueued or
//! dequeued. The producer stamps the id and timestamp once at creation;
//! after that an event is only ever copied, never changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of queue state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// An item entered the queue
    Enqueued,
    /// An item left the queue
    Dequeued,
}

impl EventType {
    /// Signed contribution of this event to a queue's running count
    pub fn delta(self) -> i64 {
        match self {
            EventType::Enqueued => 1,
            EventType::Dequeued => -1,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Enqueued => write!(f, "ENQUEUED"),
            EventType::Dequeued => write!(f, "DEQUEUED"),
        }
    }
}

/// An immutable event in the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque unique identifier
    #[serde(rename = "eventId")]
    pub id: String,

    /// When the producer created the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(rename = "eventType")]
    pub event_type: EventType,

    /// Aggregation key
    #[serde(rename = "queueId")]
    pub queue_id: String,

    #[serde(rename = "agentId", default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    #[serde(
        rename = "interactionId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub interaction_id: Option<String>,

    /// Untyped event-specific data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
}

impl Event {
    /// Create a new event with a fresh id and the current time
    pub fn new(event_type: EventType, queue_id: impl Into<String>) -> Self {
        Self::with_timestamp(event_type, queue_id, Utc::now())
    }

    /// Create a new event with a specific timestamp
    pub fn with_timestamp(
        event_type: EventType,
        queue_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Some(timestamp),
            event_type,
            queue_id: queue_id.into(),
            agent_id: None,
            interaction_id: None,
            payload: None,
        }
    }

    /// Builder: set the agent
    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Builder: set the interaction
    pub fn with_interaction(mut self, interaction_id: impl Into<String>) -> Self {
        self.interaction_id = Some(interaction_id.into());
        self
    }

    /// Builder: attach a payload
    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Body of `POST /v1/events`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub event_type: EventType,
    pub queue_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub interaction_id: Option<String>,
    #[serde(default)]
    pub payload: Option<Map<String, Value>>,
}

impl CreateEventRequest {
    /// Turn the request into a freshly stamped event
    pub fn into_event(self) -> Event {
        Event {
            agent_id: self.agent_id,
            interaction_id: self.interaction_id,
            payload: self.payload,
            ..Event::new(self.event_type, self.queue_id)
        }
    }
}
