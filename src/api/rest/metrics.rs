//! Consumer metric endpoints

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::consumer::{ConsumerSnapshot, EventSource, Poller};
use crate::utils::time::current_timestamp_millis;

/// Response for `GET /v1/metrics/queues`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMetrics {
    pub queues: HashMap<String, i64>,
    pub total_consumed: u64,
    pub last_cursor: i64,
    pub last_lag_ms: u64,
    pub epoch: Option<String>,
    /// Server time in Unix milliseconds
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<ConsumerSnapshot> for QueueMetrics {
    fn from(snapshot: ConsumerSnapshot) -> Self {
        Self {
            queues: snapshot.aggregate.per_queue_count,
            total_consumed: snapshot.aggregate.total_consumed,
            last_cursor: snapshot.cursor.last_index,
            last_lag_ms: snapshot.aggregate.last_lag_millis,
            epoch: snapshot.cursor.epoch,
            timestamp: current_timestamp_millis(),
            last_error: snapshot.last_error,
        }
    }
}

/// Response for `GET /v1/metrics/queues/:queueId`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueCount {
    pub queue_id: String,
    pub waiting_count: i64,
}

/// GET /v1/metrics/queues - All aggregates
pub async fn list_queues<S: EventSource + 'static>(
    State(poller): State<Arc<Poller<S>>>,
) -> impl IntoResponse {
    Json(QueueMetrics::from(poller.snapshot()))
}

/// GET /v1/metrics/queues/:queueId - One queue's count (0 if never seen)
pub async fn get_queue<S: EventSource + 'static>(
    State(poller): State<Arc<Poller<S>>>,
    Path(queue_id): Path<String>,
) -> impl IntoResponse {
    let waiting_count = poller.queue_count(&queue_id);
    Json(QueueCount {
        queue_id,
        waiting_count,
    })
}
