//! Queue Event Relay - consumer entry point
//!
//! Polls the producer on a fixed delay, keeps the cursor in a file and
//! serves the running aggregates over HTTP.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use queue_event_relay::api::{create_consumer_router, serve};
use queue_event_relay::config::ConsumerConfig;
use queue_event_relay::consumer::{CursorStore, HttpEventSource, Poller};
use queue_event_relay::{RelayError, RelayResult};

#[tokio::main]
async fn main() -> RelayResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = ConsumerConfig::from_env()?;
    info!(
        version = queue_event_relay::VERSION,
        producer = %config.producer_url,
        interval_ms = config.poll_interval.as_millis() as u64,
        "relay-consumer starting"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(true);
    })
    .map_err(|e| RelayError::Config(format!("failed to install signal handler: {e}")))?;

    let poller = Arc::new(Poller::new(
        HttpEventSource::new(&config.producer_url),
        CursorStore::new(&config.cursor_file),
        config.batch_limit,
    ));

    let poll_task = {
        let poller = poller.clone();
        let shutdown = shutdown_rx.clone();
        let (initial_delay, interval) = (config.initial_delay, config.poll_interval);
        tokio::spawn(async move { poller.run(initial_delay, interval, shutdown).await })
    };

    let listener = TcpListener::bind(config.bind_addr).await?;
    serve(listener, create_consumer_router(poller), shutdown_rx).await?;

    // Let an in-flight cycle finish persisting its cursor
    if let Err(e) = poll_task.await {
        tracing::error!(error = %e, "Poll task ended abnormally");
    }

    info!("relay-consumer stopped");
    Ok(())
}
