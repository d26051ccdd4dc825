//! REST API module for HTTP endpoints
//!
//! Producer:
//! - `POST /v1/events` - Create an event
//! - `GET /v1/events/poll` - Page through the log after a cursor
//! - `GET /v1/events/stats` - Producer counters
//! - `GET /v1/events/health` - Liveness
//!
//! Consumer:
//! - `GET /v1/metrics/queues` - All aggregates
//! - `GET /v1/metrics/queues/:queueId` - One queue's count
//! - `GET /v1/metrics/health` - Liveness

pub mod events;
pub mod metrics;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("No such endpoint")
}

/// Health check body shared by both services
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "UP" }))
}
