//! Utility functions and helpers
//!
//! Timestamps and atomic file writes.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write, remove_stale_temp};
pub use time::{current_timestamp_millis, lag_millis};
