//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::Router;
use pulse_common::{AppConfig, AppError};
use pulse_realtime::SharedRealtime;
use pulse_service::{TypingRegistry, TypingService, TypingSweeper};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(
        router,
        &state.config().cors,
        state.config().app.env.is_production(),
    );
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
///
/// Picks the realtime provider from configuration and starts the sweep
/// loop, so this must run inside a Tokio runtime.
pub fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let realtime = pulse_realtime::connect(&config.realtime)
        .map_err(|e| AppError::config(format!("Failed to set up realtime provider: {}", e)))?;
    Ok(create_app_state_with(realtime, config))
}

/// Create AppState around an existing realtime handle
///
/// Used by tests to inject a fake provider.
pub fn create_app_state_with(realtime: SharedRealtime, config: AppConfig) -> AppState {
    let registry = Arc::new(TypingRegistry::new());
    let typing = Arc::new(TypingService::new(
        Arc::clone(&registry),
        Arc::clone(&realtime),
    ));
    let sweeper = Arc::new(TypingSweeper::new(
        registry,
        Arc::clone(&realtime),
        config.typing.ttl(),
        config.typing.sweep_interval(),
    ));
    Arc::clone(&sweeper).start();

    AppState::new(typing, sweeper, realtime, config)
}

/// Run the HTTP server until a shutdown signal arrives
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::config(format!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();

    // Create app state
    let state = create_app_state(config)?;

    // Build application
    let app = create_app(state.clone());

    // Run server
    run_server(app, &addr).await?;

    // Drain background work before exit
    state.sweeper().stop();
    state.realtime().close().await;
    info!("Server shut down");

    Ok(())
}
