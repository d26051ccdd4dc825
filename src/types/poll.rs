//! Poll protocol payloads

use serde::{Deserialize, Serialize};

use super::event::Event;

/// One page of the producer's log, as returned by `GET /v1/events/poll`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResult {
    /// Events after the requested cursor, in index order
    #[serde(default)]
    pub events: Vec<Event>,
    /// Cursor the consumer should store once these events are applied
    pub next_cursor: i64,
    /// Identity of the log instance that served this page
    pub epoch: String,
    /// More events are waiting beyond `next_cursor`
    #[serde(default)]
    pub has_more: bool,
}

/// Producer-side counters for `GET /v1/events/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    /// Events created since the log was created
    pub total_events_created: u64,
    /// Events currently held in memory
    pub events_in_memory: usize,
}
