//! Error types for realtime operations.

/// Error type for realtime connector operations
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("Authentication rejected by realtime provider: {0}")]
    Auth(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to encode event payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Subscribe stream ended")]
    StreamEnded,

    #[error("Connection is closed")]
    Closed,
}

impl RealtimeError {
    /// Whether the error ends the connection for good.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Closed)
    }
}

/// Result type for realtime connector operations
pub type RealtimeResult<T> = Result<T, RealtimeError>;
