//! Event Log - in-memory append-only sequence
//!
//! Every log instance draws a fresh epoch when it is created. Indices are
//! only meaningful together with that epoch: a restarted producer gets a new
//! log, a new epoch, and indices that start over at 0.

use parking_lot::Mutex;

use crate::types::Event;

struct LogInner {
    events: Vec<Event>,
    total_created: u64,
}

/// Append-only, index-addressable event log
pub struct EventLog {
    epoch: String,
    inner: Mutex<LogInner>,
}

impl EventLog {
    /// Create an empty log with a newly generated epoch
    pub fn new() -> Self {
        Self::with_epoch(uuid::Uuid::new_v4().to_string())
    }

    /// Create an empty log with a known epoch
    pub fn with_epoch(epoch: impl Into<String>) -> Self {
        Self {
            epoch: epoch.into(),
            inner: Mutex::new(LogInner {
                events: Vec::new(),
                total_created: 0,
            }),
        }
    }

    /// Epoch of this log instance
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Append an event, returning it together with its assigned index
    ///
    /// The index is the length of the log before the append.
    pub fn append(&self, event: Event) -> (Event, i64) {
        let mut inner = self.inner.lock();
        let index = inner.events.len() as i64;
        inner.events.push(event.clone());
        inner.total_created += 1;
        (event, index)
    }

    /// Events after `after_index`, at most `limit` of them, in index order
    ///
    /// Returns an empty vector when nothing lies beyond `after_index`.
    pub fn query(&self, after_index: i64, limit: usize) -> Vec<Event> {
        let inner = self.inner.lock();
        Self::slice_after(&inner.events, after_index, limit)
    }

    /// Range read plus the current length, taken under one lock acquisition
    pub(crate) fn query_with_len(&self, after_index: i64, limit: usize) -> (Vec<Event>, usize) {
        let inner = self.inner.lock();
        (
            Self::slice_after(&inner.events, after_index, limit),
            inner.events.len(),
        )
    }

    fn slice_after(events: &[Event], after_index: i64, limit: usize) -> Vec<Event> {
        let start = usize::try_from(after_index.saturating_add(1).max(0)).unwrap_or(usize::MAX);
        if start >= events.len() {
            return Vec::new();
        }
        let end = start.saturating_add(limit).min(events.len());
        events[start..end].to_vec()
    }

    /// Number of events currently held
    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    /// Whether the log holds no events
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events created since this log was created
    pub fn total_created(&self) -> u64 {
        self.inner.lock().total_created
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
