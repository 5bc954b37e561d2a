//! Wire events
//!
//! Payloads that travel over the realtime channel. All events serialize with
//! camelCase keys and epoch-millisecond timestamps so every consumer, Rust
//! or not, reads the same shape.

use crate::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Event name for typing indicator updates.
pub const TYPING: &str = "typing";

/// Event name for chat messages.
pub const CHAT_MESSAGE: &str = "chat-message";

/// Event name for a participant entering the room.
pub const PRESENCE_ENTER: &str = "presence.enter";

/// Event name for a participant leaving the room.
pub const PRESENCE_LEAVE: &str = "presence.leave";

/// Current time as epoch milliseconds.
#[must_use]
pub fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// === Typing ===

/// Typing indicator update for a single participant.
///
/// `is_typing: true` means the participant signalled activity just now;
/// `false` means they stopped, either explicitly or by TTL eviction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingEvent {
    pub participant_id: ParticipantId,
    pub is_typing: bool,
    pub timestamp: i64,
}

impl TypingEvent {
    /// Typing-started event stamped with the current time.
    #[must_use]
    pub fn started(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            is_typing: true,
            timestamp: epoch_millis(),
        }
    }

    /// Typing-stopped event stamped with the current time.
    #[must_use]
    pub fn stopped(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            is_typing: false,
            timestamp: epoch_millis(),
        }
    }
}

// === Chat messages ===

/// A chat message broadcast to the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message id (UUID v4).
    pub id: String,
    pub participant_id: ParticipantId,
    pub text: String,
    pub timestamp: i64,
}

impl ChatMessage {
    /// Create a message from the given participant, stamped with the
    /// current time and a fresh id.
    #[must_use]
    pub fn new(participant_id: ParticipantId, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            participant_id,
            text: text.into(),
            timestamp: epoch_millis(),
        }
    }
}

// === Presence ===

/// A member of the room's presence set.
///
/// The client id distinguishes connections; the participant id is the
/// display identity shown in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceMember {
    pub participant_id: ParticipantId,
    pub client_id: String,
}

impl PresenceMember {
    #[must_use]
    pub fn new(participant_id: ParticipantId, client_id: impl Into<String>) -> Self {
        Self {
            participant_id,
            client_id: client_id.into(),
        }
    }
}
