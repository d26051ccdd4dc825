//! Reconciliation Integration Tests
//!
//! Drives a real `PollService` and `Poller` together through:
//! - Incremental catch-up across several cycles
//! - Producer restarts (epoch change) and full replay
//! - Consumer restarts resuming from the cursor file

use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use queue_event_relay::consumer::{
    CursorState, CursorStore, CycleOutcome, EventSource, LocalEventSource, Poller,
};
use queue_event_relay::event_store::{EventLog, PollService};
use queue_event_relay::types::{Event, EventType, PollResult};
use queue_event_relay::RelayResult;

/// In-process producer that can be "restarted" with a new log
#[derive(Clone)]
struct RestartableProducer {
    current: Arc<Mutex<PollService>>,
}

impl RestartableProducer {
    fn new(epoch: &str) -> Self {
        let service = PollService::with_log(Arc::new(EventLog::with_epoch(epoch)));
        Self {
            current: Arc::new(Mutex::new(service)),
        }
    }

    fn service(&self) -> PollService {
        self.current.lock().clone()
    }

    fn restart(&self, epoch: &str) -> PollService {
        let fresh = PollService::with_log(Arc::new(EventLog::with_epoch(epoch)));
        *self.current.lock() = fresh.clone();
        fresh
    }
}

impl EventSource for RestartableProducer {
    async fn poll(&self, after_index: i64, limit: usize) -> RelayResult<PollResult> {
        let service = self.service();
        Ok(service.poll(after_index, limit))
    }
}

fn emit(service: &PollService, event_type: EventType, queue: &str, n: usize) {
    for _ in 0..n {
        service.create_event(Event::new(event_type, queue));
    }
}

#[tokio::test]
async fn test_incremental_catch_up() {
    let dir = TempDir::new().unwrap();
    let producer = PollService::new();
    let poller = Poller::new(
        LocalEventSource::new(producer.clone()),
        CursorStore::new(dir.path().join("cursor.txt")),
        100,
    );

    assert_eq!(poller.poll_once().await.unwrap(), CycleOutcome::Idle);

    emit(&producer, EventType::Enqueued, "support", 3);
    assert_eq!(
        poller.poll_once().await.unwrap(),
        CycleOutcome::Applied { events: 3, cursor: 2 }
    );

    emit(&producer, EventType::Dequeued, "support", 2);
    emit(&producer, EventType::Enqueued, "billing", 1);
    assert_eq!(
        poller.poll_once().await.unwrap(),
        CycleOutcome::Applied { events: 3, cursor: 5 }
    );

    let snapshot = poller.snapshot();
    assert_eq!(snapshot.aggregate.queue_count("support"), 1);
    assert_eq!(snapshot.aggregate.queue_count("billing"), 1);
    assert_eq!(snapshot.aggregate.total_consumed, 6);
    assert_eq!(snapshot.cursor.epoch.as_deref(), Some(producer.epoch()));
}

#[tokio::test]
async fn test_small_batches_page_through_backlog() {
    let dir = TempDir::new().unwrap();
    let producer = PollService::new();
    emit(&producer, EventType::Enqueued, "q", 7);

    let poller = Poller::new(
        LocalEventSource::new(producer.clone()),
        CursorStore::new(dir.path().join("cursor.txt")),
        3,
    );

    let mut cycles = 0;
    while let CycleOutcome::Applied { .. } = poller.poll_once().await.unwrap() {
        cycles += 1;
    }

    assert_eq!(cycles, 3);
    assert_eq!(poller.queue_count("q"), 7);
    assert_eq!(poller.cursor().last_index, 6);
}

#[tokio::test]
async fn test_producer_restart_triggers_full_replay() {
    let dir = TempDir::new().unwrap();
    let producer = RestartableProducer::new("E1");
    emit(&producer.service(), EventType::Enqueued, "queue-1", 5);

    let poller = Poller::new(
        producer.clone(),
        CursorStore::new(dir.path().join("cursor.txt")),
        100,
    );
    poller.poll_once().await.unwrap();
    assert_eq!(poller.cursor(), CursorState::new(4, Some("E1".to_string())));

    // Restart with a smaller log under a new epoch
    let restarted = producer.restart("E2");
    emit(&restarted, EventType::Enqueued, "queue-1", 1);
    emit(&restarted, EventType::Dequeued, "queue-1", 1);

    let outcome = poller.poll_once().await.unwrap();
    assert!(matches!(outcome, CycleOutcome::EpochReset { ref current, .. } if current == "E2"));
    let reset = poller.snapshot();
    assert_eq!(reset.cursor, CursorState::new(-1, Some("E2".to_string())));
    assert_eq!(reset.aggregate.total_consumed, 0);
    assert!(reset.aggregate.per_queue_count.is_empty());

    poller.poll_once().await.unwrap();
    let replayed = poller.snapshot();
    assert_eq!(replayed.cursor, CursorState::new(1, Some("E2".to_string())));
    assert_eq!(replayed.aggregate.total_consumed, 2);
    assert_eq!(replayed.aggregate.queue_count("queue-1"), 0);
}

#[tokio::test]
async fn test_consumer_restart_resumes_from_cursor_file() {
    let dir = TempDir::new().unwrap();
    let cursor_path = dir.path().join("data").join("consumer-cursor.txt");
    let producer = PollService::new();
    emit(&producer, EventType::Enqueued, "q", 4);

    {
        let poller = Poller::new(
            LocalEventSource::new(producer.clone()),
            CursorStore::new(&cursor_path),
            100,
        );
        poller.poll_once().await.unwrap();
    }

    emit(&producer, EventType::Dequeued, "q", 1);

    // Aggregates are in-memory only; the new process starts counting afresh
    let poller = Poller::new(
        LocalEventSource::new(producer.clone()),
        CursorStore::new(&cursor_path),
        100,
    );
    assert_eq!(poller.cursor().last_index, 3);

    assert_eq!(
        poller.poll_once().await.unwrap(),
        CycleOutcome::Applied { events: 1, cursor: 4 }
    );
    assert_eq!(poller.queue_count("q"), -1);
}

#[tokio::test]
async fn test_legacy_cursor_file_adopts_first_epoch() {
    let dir = TempDir::new().unwrap();
    let cursor_path = dir.path().join("cursor.txt");
    std::fs::write(&cursor_path, "1\n").unwrap();

    let producer = PollService::new();
    emit(&producer, EventType::Enqueued, "q", 3);

    let poller = Poller::new(
        LocalEventSource::new(producer.clone()),
        CursorStore::new(&cursor_path),
        100,
    );
    poller.poll_once().await.unwrap();

    assert_eq!(poller.queue_count("q"), 1);
    assert_eq!(
        CursorStore::new(&cursor_path).load(),
        CursorState::new(2, Some(producer.epoch().to_string()))
    );
}
