//! Channel message envelope.

use serde::{Deserialize, Serialize};

/// Envelope for everything that travels over the room channel.
///
/// `event` names the payload type (see `pulse_core::events`); `data` is the
/// payload itself, kept as raw JSON so the transport stays agnostic of the
/// event vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Event name (e.g., "typing", "chat-message")
    pub event: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl ChannelMessage {
    /// Create a new message
    #[must_use]
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode the payload into a concrete event type
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }
}
