//! Process configuration
//!
//! All configuration is loaded from environment variables. `from_env` reads
//! the real environment; `from_lookup` takes any key lookup so tests can
//! supply values without touching process state.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{RelayError, RelayResult};
use crate::event_store::MAX_POLL_LIMIT;

/// Producer process configuration
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Address the HTTP API listens on
    pub bind_addr: SocketAddr,
}

impl ProducerConfig {
    /// Load from the environment
    ///
    /// - `PRODUCER_ADDR` -- listen address (default `0.0.0.0:8080`)
    pub fn from_env() -> RelayResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> RelayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            bind_addr: parse_or(&lookup, "PRODUCER_ADDR", "0.0.0.0:8080")?,
        })
    }
}

/// Consumer process configuration
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Base URL of the producer
    pub producer_url: String,
    /// Address the metrics API listens on
    pub bind_addr: SocketAddr,
    /// Where the cursor is persisted
    pub cursor_file: PathBuf,
    /// Delay between the end of one cycle and the start of the next
    pub poll_interval: Duration,
    /// Delay before the first cycle
    pub initial_delay: Duration,
    /// Page size requested per poll
    pub batch_limit: usize,
}

impl ConsumerConfig {
    /// Load from the environment
    ///
    /// - `PRODUCER_URL` -- producer base URL (default `http://localhost:8080`)
    /// - `CONSUMER_ADDR` -- metrics listen address (default `0.0.0.0:8081`)
    /// - `CONSUMER_CURSOR_FILE` -- cursor file (default `data/consumer-cursor.txt`)
    /// - `POLL_INTERVAL_MS` -- fixed delay between cycles (default 5000)
    /// - `POLL_INITIAL_DELAY_MS` -- delay before the first cycle (default 2000)
    /// - `POLL_BATCH_LIMIT` -- events per poll, 1..=1000 (default 100)
    pub fn from_env() -> RelayResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> RelayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let producer_url =
            lookup("PRODUCER_URL").unwrap_or_else(|| "http://localhost:8080".to_owned());
        if !producer_url.starts_with("http://") && !producer_url.starts_with("https://") {
            return Err(RelayError::Config(format!(
                "invalid PRODUCER_URL: {producer_url}"
            )));
        }

        let batch_limit: usize = parse_or(&lookup, "POLL_BATCH_LIMIT", "100")?;
        if batch_limit == 0 || batch_limit > MAX_POLL_LIMIT {
            return Err(RelayError::Config(format!(
                "invalid POLL_BATCH_LIMIT: {batch_limit} (expected 1..={MAX_POLL_LIMIT})"
            )));
        }

        Ok(Self {
            producer_url,
            bind_addr: parse_or(&lookup, "CONSUMER_ADDR", "0.0.0.0:8081")?,
            cursor_file: PathBuf::from(
                lookup("CONSUMER_CURSOR_FILE")
                    .unwrap_or_else(|| "data/consumer-cursor.txt".to_owned()),
            ),
            poll_interval: Duration::from_millis(parse_or(&lookup, "POLL_INTERVAL_MS", "5000")?),
            initial_delay: Duration::from_millis(parse_or(
                &lookup,
                "POLL_INITIAL_DELAY_MS",
                "2000",
            )?),
            batch_limit,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: &str) -> RelayResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_owned());
    raw.trim()
        .parse()
        .map_err(|e| RelayError::Config(format!("invalid {key}: {e}")))
}
