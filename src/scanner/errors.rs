//! Error types for the external calls made during a tick.

use std::time::Duration;
use thiserror::Error;

/// Failure of one of the upstream HTTP APIs.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Not found: {url}")]
    NotFound { url: String },
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    /// Whether the fault might clear up on a later tick.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Transport(_) => true,
            SourceError::Status { status, .. } => *status == 429 || *status >= 500,
            SourceError::NotFound { .. } | SourceError::Decode(_) => false,
        }
    }
}

/// Failure to reach the chat channel.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Could not find channel with ID {0}")]
    ChannelNotFound(u64),
    #[error("Discord error: {0}")]
    Gateway(#[from] serenity::Error),
    #[error("No response from Discord within {0:?}")]
    Timeout(Duration),
}

/// Reason a tick stopped early.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Channel unavailable: {0}")]
    Channel(#[source] DeliveryError),
    #[error("Scan error: {0}")]
    Discovery(#[source] SourceError),
    #[error("Failed to deliver alert for {symbol}: {source}")]
    Delivery {
        symbol: String,
        #[source]
        source: DeliveryError,
    },
}
