//! Application state
//!
//! Holds the shared state for the Axum application including
//! the typing services, the realtime handle, and configuration.

use std::sync::Arc;

use pulse_common::AppConfig;
use pulse_realtime::SharedRealtime;
use pulse_service::{TypingService, TypingSweeper};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Typing signal service
    typing: Arc<TypingService>,
    /// Background eviction loop, kept for shutdown
    sweeper: Arc<TypingSweeper>,
    /// Realtime provider handle
    realtime: SharedRealtime,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        typing: Arc<TypingService>,
        sweeper: Arc<TypingSweeper>,
        realtime: SharedRealtime,
        config: AppConfig,
    ) -> Self {
        Self {
            typing,
            sweeper,
            realtime,
            config: Arc::new(config),
        }
    }

    /// Get the typing service
    pub fn typing(&self) -> &TypingService {
        &self.typing
    }

    /// Get the sweeper handle
    pub fn sweeper(&self) -> &TypingSweeper {
        &self.sweeper
    }

    /// Get the realtime provider handle
    pub fn realtime(&self) -> &SharedRealtime {
        &self.realtime
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("typing", &"TypingService")
            .field("sweeper", &"TypingSweeper")
            .field("realtime", &self.realtime.connection_state())
            .field("config", &"AppConfig")
            .finish()
    }
}
