//! Application configuration structs
//!
//! Loads configuration from environment variables, with defaults suitable
//! for running the whole demo on one machine.

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub realtime: RealtimeConfig,
    pub typing: TypingConfig,
    pub cors: CorsConfig,
    pub client: ClientConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Realtime provider configuration
///
/// When no key is configured the system runs in local-only mode: events
/// loop back in-process and nothing reaches the hosted provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub rest_url: Option<String>,
    #[serde(default = "default_channel")]
    pub channel: String,
}

impl RealtimeConfig {
    /// Whether a provider credential is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }
}

/// Typing indicator liveness configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TypingConfig {
    /// How long a typing signal stays fresh, in milliseconds.
    #[serde(default = "default_typing_ttl_ms")]
    pub ttl_ms: u64,
    /// How often the sweep loop scans for stale entries, in milliseconds.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

impl TypingConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Client-side configuration (where the terminal client finds the backend)
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
}

// Default value functions
fn default_app_name() -> String {
    "pulse".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_channel() -> String {
    "chat".to_string()
}

fn default_typing_ttl_ms() -> u64 {
    3000
}

fn default_sweep_interval_ms() -> u64 {
    5000
}

fn default_backend_url() -> String {
    "http://127.0.0.1:3001".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a configured value fails validation, or if a
    /// realtime key is set without a REST URL to go with it.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: env::var("PULSE_SERVER_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("PULSE_SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_port),
            },
            realtime: RealtimeConfig {
                key: env::var("PULSE_REALTIME_KEY").ok().and_then(non_empty),
                rest_url: env::var("PULSE_REALTIME_REST_URL").ok().and_then(non_empty),
                channel: env::var("PULSE_REALTIME_CHANNEL")
                    .ok()
                    .and_then(non_empty)
                    .unwrap_or_else(default_channel),
            },
            typing: TypingConfig {
                ttl_ms: env::var("PULSE_TYPING_TTL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_typing_ttl_ms),
                sweep_interval_ms: env::var("PULSE_SWEEP_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_sweep_interval_ms),
            },
            cors: CorsConfig {
                allowed_origins: env::var("PULSE_CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            client: ClientConfig {
                backend_url: env::var("PULSE_BACKEND_URL")
                    .ok()
                    .and_then(non_empty)
                    .unwrap_or_else(default_backend_url),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    /// Returns an error for zero liveness windows or a key without a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.realtime.key.is_some() && self.realtime.rest_url.is_none() {
            return Err(ConfigError::MissingVar("PULSE_REALTIME_REST_URL"));
        }
        if self.typing.ttl_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "PULSE_TYPING_TTL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.typing.sweep_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "PULSE_SWEEP_INTERVAL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Treat empty or whitespace-only env values as unset.
fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
