//! Error types for the etcd extraction pipeline.

use std::time::Duration;
use thiserror::Error;

/// Store read errors. Always recoverable: the root is skipped for the cycle.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Store request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Store connection error: {0}")]
    Connection(String),

    #[error("Store request failed: {0}")]
    Transport(String),

    #[error("Store error {code}: {message} ({cause})")]
    Api {
        code: u32,
        message: String,
        cause: String,
    },

    #[error("Unexpected store response (HTTP {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),
}

/// Publication errors that cannot be contained within a cycle.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Top-level errors for startup and the scheduler loop.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl From<config::ConfigError> for ExtractError {
    fn from(err: config::ConfigError) -> Self {
        ExtractError::ConfigError(err.to_string())
    }
}

impl StoreError {
    /// Map a reqwest failure onto the store error taxonomy.
    pub(crate) fn from_http(error: reqwest::Error, deadline: Duration) -> Self {
        if error.is_timeout() {
            StoreError::Timeout(deadline)
        } else if error.is_connect() {
            StoreError::Connection(error.to_string())
        } else if error.is_decode() {
            StoreError::Decode(error.to_string())
        } else {
            StoreError::Transport(error.to_string())
        }
    }
}
