//! Aggregator - running totals derived from consumed events
//!
//! Delivery is at-least-once, so nothing here deduplicates: a replayed
//! batch is counted again. Per-queue counts are signed running totals
//! and may go negative when dequeues arrive without matching enqueues.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::types::{Event, EventType};
use crate::utils::time::lag_millis;

/// Derived state of everything consumed within the current epoch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateState {
    /// Signed count per queue
    pub per_queue_count: HashMap<String, i64>,
    /// Events applied since the last reset
    pub total_consumed: u64,
    /// Lag of the most recently applied timestamped event
    pub last_lag_millis: u64,
}

impl AggregateState {
    /// Apply one event, measuring lag against `now`
    pub fn apply(&mut self, event: &Event, now: DateTime<Utc>) {
        self.total_consumed += 1;

        if let Some(created) = event.timestamp {
            self.last_lag_millis = lag_millis(created, now);
        }

        *self
            .per_queue_count
            .entry(event.queue_id.clone())
            .or_insert(0) += event.event_type.delta();

        match event.event_type {
            EventType::Enqueued => debug!(queue_id = %event.queue_id, "ENQUEUED event"),
            EventType::Dequeued => debug!(queue_id = %event.queue_id, "DEQUEUED event"),
        }
    }

    /// Apply a batch in arrival order
    pub fn apply_all<'a, I>(&mut self, events: I, now: DateTime<Utc>)
    where
        I: IntoIterator<Item = &'a Event>,
    {
        for event in events {
            self.apply(event, now);
        }
    }

    /// Count for one queue (0 if never seen)
    pub fn queue_count(&self, queue_id: &str) -> i64 {
        self.per_queue_count.get(queue_id).copied().unwrap_or(0)
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.per_queue_count.clear();
        self.total_consumed = 0;
        self.last_lag_millis = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(event_type: EventType, queue: &str) -> Event {
        Event::new(event_type, queue)
    }

    #[test]
    fn test_two_enqueues_one_dequeue() {
        let mut state = AggregateState::default();
        let batch = vec![
            event(EventType::Enqueued, "queue-1"),
            event(EventType::Enqueued, "queue-1"),
            event(EventType::Dequeued, "queue-1"),
        ];

        state.apply_all(&batch, Utc::now());

        assert_eq!(state.queue_count("queue-1"), 1);
        assert_eq!(state.total_consumed, 3);
    }

    #[test]
    fn test_counts_may_go_negative() {
        let mut state = AggregateState::default();
        state.apply(&event(EventType::Dequeued, "q"), Utc::now());
        state.apply(&event(EventType::Dequeued, "q"), Utc::now());

        assert_eq!(state.queue_count("q"), -2);
        assert_eq!(state.queue_count("unknown"), 0);
    }

    #[test]
    fn test_count_is_n_minus_m_across_batches() {
        let mut state = AggregateState::default();
        let now = Utc::now();
        // 7 enqueues and 4 dequeues interleaved over three batches
        let pattern = "EEDEDDEEEDE";
        let events: Vec<Event> = pattern
            .chars()
            .map(|c| match c {
                'E' => event(EventType::Enqueued, "k"),
                _ => event(EventType::Dequeued, "k"),
            })
            .collect();

        for batch in events.chunks(4) {
            state.apply_all(batch, now);
        }

        assert_eq!(state.queue_count("k"), 7 - 4);
        assert_eq!(state.total_consumed, 11);
    }

    #[test]
    fn test_last_event_lag_wins() {
        let mut state = AggregateState::default();
        let now = Utc::now();
        let old = Event::with_timestamp(EventType::Enqueued, "q", now - Duration::seconds(10));
        let recent = Event::with_timestamp(EventType::Enqueued, "q", now - Duration::milliseconds(250));

        state.apply_all([&old, &recent], now);
        assert_eq!(state.last_lag_millis, 250);
    }

    #[test]
    fn test_missing_timestamp_keeps_previous_lag() {
        let mut state = AggregateState::default();
        let now = Utc::now();
        state.apply(
            &Event::with_timestamp(EventType::Enqueued, "q", now - Duration::milliseconds(40)),
            now,
        );

        let mut untimed = event(EventType::Dequeued, "q");
        untimed.timestamp = None;
        state.apply(&untimed, now);

        assert_eq!(state.last_lag_millis, 40);
        assert_eq!(state.total_consumed, 2);
    }

    #[test]
    fn test_clear() {
        let mut state = AggregateState::default();
        state.apply(&event(EventType::Enqueued, "q"), Utc::now());
        state.clear();
        assert_eq!(state, AggregateState::default());
    }
}
