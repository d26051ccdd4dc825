//! Queue Event Relay
//!
//! Pull-based propagation of queue events from a producer holding an
//! in-memory, append-only log to a consumer that keeps a durable cursor and
//! running per-queue aggregates.
//!
//! # Features
//!
//! - **Epoch-tagged log**: every producer log instance carries a fresh epoch,
//!   so consumers notice restarts and resync from the start
//! - **Stateless polling**: `after` + `limit` in, page + next cursor out
//! - **Durable cursor**: `(cursor, epoch)` written with temp-file + rename
//! - **Signed aggregates**: per-queue running totals, consumed count, lag
//!
//! # Modules
//!
//! - `types`: Event and poll payloads
//! - `event_store`: Producer log and poll service
//! - `consumer`: Cursor store, aggregator, event sources, poller
//! - `api`: Axum routers for both processes
//! - `config`: Environment configuration
//! - `utils`: Timestamps and atomic file writes
//!
//! # Example
//!
//! ```no_run
//! use queue_event_relay::consumer::{CursorStore, LocalEventSource, Poller};
//! use queue_event_relay::event_store::PollService;
//! use queue_event_relay::types::{Event, EventType};
//!
//! # async fn demo() -> queue_event_relay::RelayResult<()> {
//! let producer = PollService::new();
//! producer.create_event(Event::new(EventType::Enqueued, "support"));
//!
//! let poller = Poller::new(
//!     LocalEventSource::new(producer.clone()),
//!     CursorStore::new("data/consumer-cursor.txt"),
//!     100,
//! );
//! poller.poll_once().await?;
//! assert_eq!(poller.queue_count("support"), 1);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod consumer;
pub mod error;
pub mod event_store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use consumer::{AggregateState, CursorState, CursorStore, Poller};
pub use error::{RelayError, RelayResult};
pub use event_store::{EventLog, PollService};
pub use types::{Event, EventType, PollResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
