//! # pulse-realtime
//!
//! Realtime provider layer: a trait over publish/subscribe/presence, a
//! hosted-provider connector (REST publish + SSE subscribe), and an
//! in-process local bus used when no provider credential is configured.
//!
//! ## Example
//!
//! ```ignore
//! use pulse_realtime::{connect, ChannelMessage};
//!
//! let realtime = connect(&config.realtime)?;
//! let mut rx = realtime.subscribe();
//!
//! realtime.publish("typing", serde_json::json!({ "isTyping": true })).await?;
//! let message: ChannelMessage = rx.recv().await?;
//! ```

pub mod connection;
pub mod connector;
pub mod error;
pub mod hosted;
pub mod local;
pub mod message;

// Re-export commonly used types at crate root
pub use connection::ConnectionState;
pub use connector::{connect, Realtime, SharedRealtime};
pub use error::{RealtimeError, RealtimeResult};
pub use hosted::{HostedConfig, HostedConnector};
pub use local::LocalBus;
pub use message::ChannelMessage;
