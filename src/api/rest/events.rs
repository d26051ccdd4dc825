//! Producer endpoints

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::ApiError;
use crate::event_store::{normalize_limit, PollService, DEFAULT_POLL_LIMIT};
use crate::types::{CreateEventRequest, Event};

/// Query parameters for polling
///
/// Both values arrive as raw strings so that a malformed value falls back
/// to its default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PollParams {
    /// Cursor to read after (default: -1, from the start)
    pub after: Option<String>,
    /// Maximum number of events to return (default: 100, range 1..=1000)
    pub limit: Option<String>,
}

impl PollParams {
    pub fn after_index(&self) -> i64 {
        parse_param(self.after.as_deref()).unwrap_or(-1)
    }

    pub fn normalized_limit(&self) -> usize {
        parse_param(self.limit.as_deref()).map_or(DEFAULT_POLL_LIMIT, normalize_limit)
    }
}

fn parse_param(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

/// POST /v1/events - Create a single event
pub async fn create_event(
    State(service): State<PollService>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if request.queue_id.trim().is_empty() {
        return Err(ApiError::bad_request("queueId must not be empty"));
    }

    info!(
        event_type = %request.event_type,
        queue_id = %request.queue_id,
        "Creating event"
    );
    Ok(Json(service.create_event(request.into_event())))
}

/// GET /v1/events/poll - Events after a cursor
pub async fn poll_events(
    State(service): State<PollService>,
    Query(params): Query<PollParams>,
) -> impl IntoResponse {
    Json(service.poll(params.after_index(), params.normalized_limit()))
}

/// GET /v1/events/stats - Producer counters
pub async fn get_stats(State(service): State<PollService>) -> impl IntoResponse {
    Json(service.stats())
}
