//! Event sources the poller can read from
//!
//! `HttpEventSource` talks to a remote producer over `GET /v1/events/poll`;
//! `LocalEventSource` reads an in-process `PollService` directly.

use std::future::Future;

use tracing::debug;

use crate::error::{RelayError, RelayResult};
use crate::event_store::PollService;
use crate::types::PollResult;

/// Anything that can answer a poll
pub trait EventSource: Send + Sync {
    /// Fetch the page after `after_index`
    fn poll(&self, after_index: i64, limit: usize)
        -> impl Future<Output = RelayResult<PollResult>> + Send;
}

/// Producer reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpEventSource {
    client: reqwest::Client,
    poll_url: String,
}

impl HttpEventSource {
    /// Source for the producer at `base_url` (e.g. `http://localhost:8080`)
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            poll_url: format!("{}/v1/events/poll", base_url.trim_end_matches('/')),
        }
    }

    /// Full poll endpoint URL
    pub fn poll_url(&self) -> &str {
        &self.poll_url
    }
}

impl EventSource for HttpEventSource {
    async fn poll(&self, after_index: i64, limit: usize) -> RelayResult<PollResult> {
        debug!(url = %self.poll_url, after_index, limit, "Polling producer");

        let response = self
            .client
            .get(&self.poll_url)
            .query(&[("after", after_index.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status.as_u16()));
        }

        Ok(response.json::<PollResult>().await?)
    }
}

/// Producer living in the same process
#[derive(Clone)]
pub struct LocalEventSource {
    service: PollService,
}

impl LocalEventSource {
    pub fn new(service: PollService) -> Self {
        Self { service }
    }
}

impl EventSource for LocalEventSource {
    async fn poll(&self, after_index: i64, limit: usize) -> RelayResult<PollResult> {
        Ok(self.service.poll(after_index, limit))
    }
}
