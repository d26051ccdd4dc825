//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::rest::{events, health, metrics, not_found};
use crate::consumer::{EventSource, Poller};
use crate::error::RelayResult;
use crate::event_store::PollService;

fn cors() -> CorsLayer {
    // Allow all origins; the APIs are read-mostly and unauthenticated
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the producer router
pub fn create_producer_router(service: PollService) -> Router {
    Router::new()
        .route("/v1/events", post(events::create_event))
        .route("/v1/events/poll", get(events::poll_events))
        .route("/v1/events/stats", get(events::get_stats))
        .route("/v1/events/health", get(health))
        .fallback(not_found)
        .layer(cors())
        .with_state(service)
}

/// Create the consumer metrics router
pub fn create_consumer_router<S: EventSource + 'static>(poller: Arc<Poller<S>>) -> Router {
    Router::new()
        .route("/v1/metrics/queues", get(metrics::list_queues::<S>))
        .route("/v1/metrics/queues/:queue_id", get(metrics::get_queue::<S>))
        .route("/v1/metrics/health", get(health))
        .fallback(not_found)
        .layer(cors())
        .with_state(poller)
}

/// Serve `router` on `listener` until `shutdown` flips to true
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> RelayResult<()> {
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow_and_update() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;

    Ok(())
}
