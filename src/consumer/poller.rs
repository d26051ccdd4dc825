//! Poller - the consumer's fetch / reconcile / apply / persist cycle
//!
//! ```text
//! IDLE ──► POLLING ──┬──► APPLYING ────┬──► PERSISTING ──► IDLE
//!                    └──► EPOCH_RESET ─┘
//! ```
//!
//! One cycle runs at a time. The cycle gate is held from the fetch until the
//! cursor is written, while the cursor and aggregate sit behind a separate
//! short-lived lock so metrics can be read mid-cycle.

use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::aggregator::AggregateState;
use super::cursor::{CursorState, CursorStore, START_CURSOR};
use super::source::EventSource;
use crate::error::RelayResult;
use crate::types::PollResult;

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing new; no state changed
    Idle,
    /// A batch was aggregated and the cursor advanced
    Applied { events: usize, cursor: i64 },
    /// The producer's epoch changed; state was wiped and the batch dropped
    EpochReset { previous: String, current: String },
}

/// Consistent copy of the consumer's state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerSnapshot {
    pub cursor: CursorState,
    pub aggregate: AggregateState,
    /// Message of the most recent failed fetch, cleared by the next success
    pub last_error: Option<String>,
}

/// Periodic, non-overlapping consumer of an [`EventSource`]
pub struct Poller<S> {
    source: S,
    store: CursorStore,
    batch_limit: usize,
    cycle: tokio::sync::Mutex<()>,
    state: Mutex<ConsumerSnapshot>,
}

impl<S: EventSource> Poller<S> {
    /// Create a poller, resuming from whatever `store` holds
    pub fn new(source: S, store: CursorStore, batch_limit: usize) -> Self {
        let cursor = store.load();
        info!(
            cursor = cursor.last_index,
            epoch = ?cursor.epoch,
            path = %store.path().display(),
            "Loaded cursor"
        );

        Self {
            source,
            store,
            batch_limit,
            cycle: tokio::sync::Mutex::new(()),
            state: Mutex::new(ConsumerSnapshot {
                cursor,
                ..Default::default()
            }),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ConsumerSnapshot {
        self.state.lock().clone()
    }

    /// Current cursor
    pub fn cursor(&self) -> CursorState {
        self.state.lock().cursor.clone()
    }

    /// Count for one queue
    pub fn queue_count(&self, queue_id: &str) -> i64 {
        self.state.lock().aggregate.queue_count(queue_id)
    }

    /// Run one full cycle
    ///
    /// A failed fetch leaves cursor, epoch and aggregates untouched and is
    /// returned as the error; the next cycle retries from the same cursor.
    pub async fn poll_once(&self) -> RelayResult<CycleOutcome> {
        let _cycle = self.cycle.lock().await;

        let after_index = self.state.lock().cursor.last_index;
        match self.source.poll(after_index, self.batch_limit).await {
            Ok(result) => Ok(self.reconcile(result, Utc::now())),
            Err(e) => {
                self.state.lock().last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn reconcile(&self, result: PollResult, now: DateTime<Utc>) -> CycleOutcome {
        let mut state = self.state.lock();
        state.last_error = None;

        let epoch_changed = state
            .cursor
            .epoch
            .as_deref()
            .is_some_and(|stored| stored != result.epoch);

        if epoch_changed {
            let previous = state.cursor.epoch.take().unwrap_or_default();
            state.aggregate.clear();
            state.cursor = CursorState::new(START_CURSOR, Some(result.epoch.clone()));
            let cursor = state.cursor.clone();
            drop(state);

            self.persist(&cursor);
            warn!(
                previous_epoch = %previous,
                epoch = %result.epoch,
                discarded = result.events.len(),
                "Producer epoch changed, reset cursor and metrics"
            );
            return CycleOutcome::EpochReset {
                previous,
                current: result.epoch,
            };
        }

        if result.events.is_empty() {
            debug!(cursor = state.cursor.last_index, "No new events from producer");
            return CycleOutcome::Idle;
        }

        state.aggregate.apply_all(&result.events, now);
        state.cursor = CursorState::new(result.next_cursor, Some(result.epoch));
        let cursor = state.cursor.clone();
        let total_consumed = state.aggregate.total_consumed;
        let last_lag_ms = state.aggregate.last_lag_millis;
        drop(state);

        self.persist(&cursor);
        info!(
            events = result.events.len(),
            cursor = cursor.last_index,
            total_consumed,
            last_lag_ms,
            has_more = result.has_more,
            "Polled events"
        );

        CycleOutcome::Applied {
            events: result.events.len(),
            cursor: cursor.last_index,
        }
    }

    fn persist(&self, cursor: &CursorState) {
        // The in-memory cursor stays advanced even if this fails
        if let Err(e) = self.store.save(cursor) {
            error!(
                path = %self.store.path().display(),
                cursor = cursor.last_index,
                error = %e,
                "Failed to write cursor file"
            );
        }
    }

    /// Poll on a fixed delay until `shutdown` flips to true or its sender
    /// is dropped
    ///
    /// The delay counts from the end of the previous cycle. Shutdown is only
    /// observed between cycles.
    pub async fn run(
        &self,
        initial_delay: Duration,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut delay = initial_delay;

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            debug!("Starting scheduled poll");
            if let Err(e) = self.poll_once().await {
                error!(error = %e, "Failed to poll events from producer");
            }
            delay = interval;
        }

        info!("Poll loop stopped");
    }
}
