//! Typing status handlers
//!
//! Endpoints for recording typing signals and reading the active set.

use axum::{extract::State, Json};
use pulse_common::AppError;
use pulse_core::ParticipantId;
use pulse_service::{TypingSnapshotResponse, TypingStatusRequest, TypingStatusResponse};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Record or clear a typing signal
///
/// POST /typing-status
pub async fn post_typing_status(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TypingStatusRequest>,
) -> ApiResult<Json<TypingStatusResponse>> {
    let participant = ParticipantId::new(request.participant_id).map_err(AppError::from)?;
    let active = state.typing().signal(participant, request.is_typing).await;
    Ok(Json(TypingStatusResponse::accepted(active)))
}

/// Snapshot of participants currently typing
///
/// GET /typing-status
pub async fn get_typing_status(State(state): State<AppState>) -> Json<TypingSnapshotResponse> {
    Json(TypingSnapshotResponse::from_active(state.typing().snapshot()))
}
