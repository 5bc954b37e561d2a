//! Health check handlers
//!
//! Endpoint for liveness probes and realtime connection visibility.

use axum::{extract::State, Json};
use pulse_service::HealthResponse;

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
///
/// Always answers 200. The body carries the upstream realtime connection
/// state so a degraded provider is visible without failing the probe.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connection_state = state.realtime().connection_state();
    Json(HealthResponse::from_connection_state(connection_state))
}
