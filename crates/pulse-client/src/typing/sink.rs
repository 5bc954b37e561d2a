//! Typing signal transport
//!
//! The publisher decides when to signal; the sink decides how the signal
//! reaches the backend.

use async_trait::async_trait;
use pulse_core::ParticipantId;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Error from delivering a typing signal
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("typing signal request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Destination for typing signals
#[async_trait]
pub trait TypingSink: Send + Sync {
    /// Deliver one typing signal for the bound participant.
    async fn send_typing(&self, is_typing: bool) -> Result<(), SinkError>;
}

/// Sink that POSTs signals to the backend typing endpoint
pub struct HttpTypingSink {
    client: reqwest::Client,
    endpoint: String,
    participant_id: ParticipantId,
}

impl HttpTypingSink {
    /// Create a sink bound to a backend URL and participant.
    pub fn new(backend_url: &str, participant_id: ParticipantId) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/typing-status", backend_url.trim_end_matches('/')),
            participant_id,
        }
    }

    /// The resolved endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TypingSignalBody<'a> {
    participant_id: &'a str,
    is_typing: bool,
}

#[async_trait]
impl TypingSink for HttpTypingSink {
    async fn send_typing(&self, is_typing: bool) -> Result<(), SinkError> {
        let body = TypingSignalBody {
            participant_id: self.participant_id.as_str(),
            is_typing,
        };
        self.client
            .post(&self.endpoint)
            .json(&body)
            .timeout(Duration::from_secs(5))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
