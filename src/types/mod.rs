//! Core data types
//!
//! This module contains the values exchanged between producer and consumer.

pub mod event;
pub mod poll;

pub use event::{CreateEventRequest, Event, EventType};
pub use poll::{PollResult, SystemStats};
