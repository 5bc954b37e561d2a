//! The `Realtime` trait and the connector factory.

use crate::connection::ConnectionState;
use crate::error::RealtimeResult;
use crate::hosted::{HostedConfig, HostedConnector};
use crate::local::LocalBus;
use crate::message::ChannelMessage;
use pulse_common::RealtimeConfig;
use pulse_core::PresenceMember;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Abstraction over the realtime provider.
///
/// The backend and the client both talk to the room through this trait;
/// whether events actually leave the process depends on the implementation.
#[async_trait::async_trait]
pub trait Realtime: Send + Sync {
    /// Publish an event to the room channel.
    async fn publish(&self, event: &str, data: serde_json::Value) -> RealtimeResult<()>;

    /// Get a receiver for every message seen on the room channel.
    fn subscribe(&self) -> broadcast::Receiver<ChannelMessage>;

    /// Register a member in the room's presence set.
    async fn enter_presence(&self, member: PresenceMember) -> RealtimeResult<()>;

    /// Remove a member from the room's presence set.
    async fn leave_presence(&self, client_id: &str) -> RealtimeResult<()>;

    /// Current presence set of the room.
    async fn presence_members(&self) -> RealtimeResult<Vec<PresenceMember>>;

    /// Current state of the provider link.
    fn connection_state(&self) -> ConnectionState;

    /// Tear the connection down. The state moves to `Closed` and further
    /// publishes are rejected.
    async fn close(&self);
}

/// Shared handle to a realtime implementation
pub type SharedRealtime = Arc<dyn Realtime>;

/// Build the realtime connector the configuration asks for.
///
/// With a provider key this is the hosted connector; without one the system
/// degrades to an in-process bus that loops events back locally.
pub fn connect(config: &RealtimeConfig) -> RealtimeResult<SharedRealtime> {
    match (&config.key, &config.rest_url) {
        (Some(key), Some(rest_url)) => {
            tracing::info!(channel = %config.channel, "Connecting to hosted realtime provider");
            let connector: SharedRealtime =
                HostedConnector::connect(HostedConfig::new(rest_url, key, &config.channel))?;
            Ok(connector)
        }
        _ => {
            tracing::warn!(
                "No realtime credential configured, events will only loop back in-process"
            );
            let bus: SharedRealtime = Arc::new(LocalBus::new());
            Ok(bus)
        }
    }
}
