//! Queue Event Relay - producer entry point
//!
//! Serves a fresh in-memory event log over HTTP. Every start draws a new
//! epoch, which tells consumers to resync from the beginning.

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use queue_event_relay::api::{create_producer_router, serve};
use queue_event_relay::config::ProducerConfig;
use queue_event_relay::event_store::PollService;
use queue_event_relay::{RelayError, RelayResult};

#[tokio::main]
async fn main() -> RelayResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = ProducerConfig::from_env()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(true);
    })
    .map_err(|e| RelayError::Config(format!("failed to install signal handler: {e}")))?;

    let service = PollService::new();
    info!(
        version = queue_event_relay::VERSION,
        epoch = %service.epoch(),
        "relay-producer starting"
    );

    let listener = TcpListener::bind(config.bind_addr).await?;
    serve(listener, create_producer_router(service), shutdown_rx).await?;

    info!("relay-producer stopped");
    Ok(())
}
