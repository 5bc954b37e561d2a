//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Field names follow the camelCase wire format used by browser clients.

use pulse_core::{events, ParticipantId};
use pulse_realtime::ConnectionState;
use serde::Serialize;

// ============================================================================
// Typing Responses
// ============================================================================

/// Acknowledgement for a typing signal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStatusResponse {
    pub success: bool,
    pub active_typing_participants: Vec<String>,
}

impl TypingStatusResponse {
    #[must_use]
    pub fn accepted(active: Vec<ParticipantId>) -> Self {
        Self {
            success: true,
            active_typing_participants: active.into_iter().map(ParticipantId::into_inner).collect(),
        }
    }
}

/// Snapshot of who is typing right now
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingSnapshotResponse {
    pub typing_participants: Vec<String>,
}

impl TypingSnapshotResponse {
    #[must_use]
    pub fn from_active(active: Vec<ParticipantId>) -> Self {
        Self {
            typing_participants: active.into_iter().map(ParticipantId::into_inner).collect(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
///
/// The endpoint itself always answers 200; `status` reports "degraded"
/// whenever the upstream realtime connection is anything but connected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub upstream_connection_state: String,
    pub timestamp: i64,
}

impl HealthResponse {
    #[must_use]
    pub fn from_connection_state(state: ConnectionState) -> Self {
        let status = if state.is_connected() { "ok" } else { "degraded" };
        Self {
            status: status.to_string(),
            upstream_connection_state: state.to_string(),
            timestamp: events::epoch_millis(),
        }
    }
}
