//! API module for the producer and consumer HTTP endpoints

pub mod http;
pub mod rest;

pub use http::{create_consumer_router, create_producer_router, serve};
