//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ClientConfig, ConfigError, CorsConfig, Environment, RealtimeConfig,
    ServerConfig, TypingConfig,
};
