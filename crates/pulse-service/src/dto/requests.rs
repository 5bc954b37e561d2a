//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Field names follow the camelCase wire format used by browser clients.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Typing Requests
// ============================================================================

/// Typing signal request
///
/// `is_typing: true` records or refreshes the sender's entry;
/// `is_typing: false` removes it immediately.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TypingStatusRequest {
    #[validate(length(min = 1, max = 64, message = "participantId must be 1-64 characters"))]
    pub participant_id: String,

    pub is_typing: bool,
}
