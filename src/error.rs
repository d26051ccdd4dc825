//! Error types shared by the producer and consumer halves of the relay.

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors that can occur while relaying events
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The poll request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The producer answered with a non-success status.
    #[error("producer returned status {0}")]
    Status(u16),

    /// Local file access failed (cursor file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON payload could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An epoch the cursor file cannot represent.
    #[error("epoch {0:?} cannot be stored in the cursor file")]
    InvalidEpoch(String),

    /// Configuration is invalid.
    #[error("config error: {0}")]
    Config(String),
}
