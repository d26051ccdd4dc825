//! Poll Service - cursor-based reads over the event log
//!
//! The poll protocol is stateless: the consumer sends its cursor, the
//! producer answers with the next page and where the cursor should go.
//! Malformed input is normalized, never rejected, so retries are harmless.

use std::sync::Arc;

use tracing::{debug, info};

use super::log::EventLog;
use crate::types::{Event, PollResult, SystemStats};

/// Page size used when the requested limit is out of range
pub const DEFAULT_POLL_LIMIT: usize = 100;

/// Largest page a single poll may request
pub const MAX_POLL_LIMIT: usize = 1000;

/// Normalize a requested page size: anything outside `1..=1000` becomes 100
pub fn normalize_limit(limit: i64) -> usize {
    if limit <= 0 || limit > MAX_POLL_LIMIT as i64 {
        DEFAULT_POLL_LIMIT
    } else {
        limit as usize
    }
}

/// Producer-side service answering polls and recording new events
#[derive(Clone)]
pub struct PollService {
    log: Arc<EventLog>,
}

impl PollService {
    /// Create a service over a fresh log
    pub fn new() -> Self {
        Self::with_log(Arc::new(EventLog::new()))
    }

    /// Create a service over an existing log
    pub fn with_log(log: Arc<EventLog>) -> Self {
        Self { log }
    }

    /// The underlying log
    pub fn log(&self) -> &Arc<EventLog> {
        &self.log
    }

    /// Current epoch
    pub fn epoch(&self) -> &str {
        self.log.epoch()
    }

    /// Store a new event
    pub fn create_event(&self, event: Event) -> Event {
        let (stored, index) = self.log.append(event);
        info!(
            event_id = %stored.id,
            event_type = %stored.event_type,
            queue_id = %stored.queue_id,
            index,
            "Event created"
        );
        stored
    }

    /// Answer a poll after `after_index`
    ///
    /// `next_cursor` never moves backward: it is the index of the last
    /// returned event, which is the tail whenever the page is not cut short
    /// by `limit`. A cursor already past the tail comes back unchanged.
    pub fn poll(&self, after_index: i64, limit: usize) -> PollResult {
        let after_index = after_index.max(-1);
        let (events, len) = self.log.query_with_len(after_index, limit);
        let tail = len as i64 - 1;
        let next_cursor = after_index.saturating_add(events.len() as i64);

        debug!(
            after_index,
            limit,
            returned = events.len(),
            next_cursor,
            "Poll request"
        );

        PollResult {
            events,
            next_cursor,
            epoch: self.log.epoch().to_string(),
            has_more: next_cursor < tail,
        }
    }

    /// Producer counters
    pub fn stats(&self) -> SystemStats {
        SystemStats {
            total_events_created: self.log.total_created(),
            events_in_memory: self.log.len(),
        }
    }
}

impl Default for PollService {
    fn default() -> Self {
        Self::new()
    }
}
