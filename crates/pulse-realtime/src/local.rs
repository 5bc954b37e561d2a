//! In-process event bus.
//!
//! Stands in for the hosted provider when no credential is configured and
//! in tests. Events published here reach only subscribers inside the same
//! process, so the connection state honestly reports `disconnected`.

use crate::connection::ConnectionState;
use crate::connector::Realtime;
use crate::error::{RealtimeError, RealtimeResult};
use crate::message::ChannelMessage;
use parking_lot::Mutex;
use pulse_core::{events, PresenceMember};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// Loopback bus implementing [`Realtime`] without any network.
pub struct LocalBus {
    tx: broadcast::Sender<ChannelMessage>,
    members: Mutex<Vec<PresenceMember>>,
    closed: AtomicBool,
}

impl LocalBus {
    /// Default broadcast buffer size.
    pub const DEFAULT_BUFFER: usize = 256;

    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer(Self::DEFAULT_BUFFER)
    }

    #[must_use]
    pub fn with_buffer(buffer: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer);
        Self {
            tx,
            members: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> RealtimeResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RealtimeError::Closed);
        }
        Ok(())
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Realtime for LocalBus {
    async fn publish(&self, event: &str, data: serde_json::Value) -> RealtimeResult<()> {
        self.ensure_open()?;
        // Send errors mean no receivers, which is fine for a loopback bus
        let _ = self.tx.send(ChannelMessage::new(event, data));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelMessage> {
        self.tx.subscribe()
    }

    async fn enter_presence(&self, member: PresenceMember) -> RealtimeResult<()> {
        self.ensure_open()?;
        {
            let mut members = self.members.lock();
            members.retain(|m| m.client_id != member.client_id);
            members.push(member.clone());
        }
        let data = serde_json::to_value(&member)?;
        let _ = self.tx.send(ChannelMessage::new(events::PRESENCE_ENTER, data));
        Ok(())
    }

    async fn leave_presence(&self, client_id: &str) -> RealtimeResult<()> {
        self.ensure_open()?;
        let left = {
            let mut members = self.members.lock();
            members
                .iter()
                .position(|m| m.client_id == client_id)
                .map(|idx| members.remove(idx))
        };
        if let Some(member) = left {
            let data = serde_json::to_value(&member)?;
            let _ = self.tx.send(ChannelMessage::new(events::PRESENCE_LEAVE, data));
        }
        Ok(())
    }

    async fn presence_members(&self) -> RealtimeResult<Vec<PresenceMember>> {
        self.ensure_open()?;
        Ok(self.members.lock().clone())
    }

    fn connection_state(&self) -> ConnectionState {
        if self.closed.load(Ordering::SeqCst) {
            ConnectionState::Closed
        } else {
            ConnectionState::Disconnected
        }
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
