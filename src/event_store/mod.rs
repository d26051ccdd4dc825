//! Event Store Module - producer side of the relay
//!
//! - `EventLog`: in-memory append-only log tagged with an epoch
//! - `PollService`: cursor-based page reads and event creation
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌──────────────┐    ┌──────────────┐
//! │ POST         │───►│ append()     │───► (event, index)
//! │ /v1/events   │    │ index = len  │
//! └──────────────┘    └──────────────┘
//!
//! Read Path:
//! ┌──────────────┐    ┌──────────────────┐
//! │ GET poll     │───►│ query(after, n)  │───► {events, nextCursor,
//! │ ?after&limit │    │ + len + epoch    │      epoch, hasMore}
//! └──────────────┘    └──────────────────┘
//! ```

mod log;
mod poll;

pub use log::EventLog;
pub use poll::{normalize_limit, PollService, DEFAULT_POLL_LIMIT, MAX_POLL_LIMIT};
