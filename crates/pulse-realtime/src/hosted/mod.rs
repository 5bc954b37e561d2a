//! Hosted realtime provider connector.
//!
//! Publishes through the provider's REST API and subscribes to the room
//! channel over a server-sent-event stream. A supervision task owns the
//! stream and keeps [`ConnectionState`] honest while it reconnects:
//! transient losses report `disconnected`, repeated losses degrade to
//! `suspended`, and a rejected credential parks the connector at `failed`.

mod sse;

use crate::connection::ConnectionState;
use crate::connector::Realtime;
use crate::error::{RealtimeError, RealtimeResult};
use crate::message::ChannelMessage;
use futures_util::StreamExt;
use parking_lot::{Mutex, RwLock};
use pulse_core::PresenceMember;
use reqwest::StatusCode;
use sse::SseParser;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Configuration for the hosted connector
#[derive(Debug, Clone)]
pub struct HostedConfig {
    /// Base URL of the provider's REST API
    pub rest_url: String,
    /// API key, sent as a bearer credential
    pub key: String,
    /// Room channel name
    pub channel: String,
    /// Broadcast buffer size for subscribers
    pub broadcast_buffer: usize,
    /// Delay between reconnect attempts
    pub retry_delay: Duration,
    /// Consecutive stream losses before the state degrades to suspended
    pub suspend_after: u32,
}

impl HostedConfig {
    #[must_use]
    pub fn new(
        rest_url: impl Into<String>,
        key: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            rest_url: rest_url.into(),
            key: key.into(),
            channel: channel.into(),
            broadcast_buffer: 1024,
            retry_delay: Duration::from_secs(1),
            suspend_after: 3,
        }
    }

    fn base(&self) -> &str {
        self.rest_url.trim_end_matches('/')
    }

    fn messages_url(&self) -> String {
        format!("{}/channels/{}/messages", self.base(), self.channel)
    }

    fn presence_url(&self) -> String {
        format!("{}/channels/{}/presence", self.base(), self.channel)
    }

    fn sse_url(&self) -> String {
        format!("{}/channels/{}/sse", self.base(), self.channel)
    }
}

/// Connector speaking to a hosted realtime provider
pub struct HostedConnector {
    http: reqwest::Client,
    config: HostedConfig,
    state: RwLock<ConnectionState>,
    tx: broadcast::Sender<ChannelMessage>,
    shutdown: AtomicBool,
    /// Consecutive stream losses since the last successful connect
    failures: AtomicU32,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl HostedConnector {
    /// Create the connector and start the subscribe supervision task.
    pub fn connect(config: HostedConfig) -> RealtimeResult<Arc<Self>> {
        // No client-wide timeout: it would cut the long-lived SSE stream.
        // Request timeouts are set per call instead.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let (tx, _) = broadcast::channel(config.broadcast_buffer);

        let connector = Arc::new(Self {
            http,
            config,
            state: RwLock::new(ConnectionState::Connecting),
            tx,
            shutdown: AtomicBool::new(false),
            failures: AtomicU32::new(0),
            supervisor: Mutex::new(None),
        });

        let handle = tokio::spawn(Self::supervise(Arc::clone(&connector)));
        *connector.supervisor.lock() = Some(handle);

        Ok(connector)
    }

    fn set_state(&self, next: ConnectionState) {
        let mut state = self.state.write();
        if *state != next {
            tracing::info!(from = %*state, to = %next, "Realtime connection state changed");
            *state = next;
        }
    }

    /// Supervision loop: run the subscribe stream, classify failures,
    /// back off and retry until shutdown or a fatal error.
    async fn supervise(self: Arc<Self>) {
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            self.set_state(ConnectionState::Connecting);

            match self.run_stream().await {
                // Ok means shutdown was observed mid-stream
                Ok(()) => break,
                Err(RealtimeError::Auth(reason)) => {
                    tracing::error!(error = %reason, "Realtime credential rejected, giving up");
                    self.set_state(ConnectionState::Failed);
                    return;
                }
                Err(e) => {
                    let failures = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
                    let next = if failures >= self.config.suspend_after {
                        ConnectionState::Suspended
                    } else {
                        ConnectionState::Disconnected
                    };
                    tracing::warn!(
                        error = %e,
                        consecutive_failures = failures,
                        "Realtime subscribe stream lost, retrying"
                    );
                    self.set_state(next);
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }

        if self.shutdown.load(Ordering::SeqCst) {
            self.set_state(ConnectionState::Closed);
        }
    }

    /// Open the SSE stream and pump events into the broadcast channel
    /// until the stream ends or shutdown is requested.
    async fn run_stream(&self) -> RealtimeResult<()> {
        let response = self
            .http
            .get(self.config.sse_url())
            .bearer_auth(&self.config.key)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RealtimeError::Auth(format!(
                "subscribe rejected with {status}"
            )));
        }
        let response = response.error_for_status()?;

        self.failures.store(0, Ordering::SeqCst);
        self.set_state(ConnectionState::Connected);
        tracing::info!(channel = %self.config.channel, "Subscribed to realtime channel");

        let mut stream = response.bytes_stream();
        let mut parser = SseParser::new();

        while let Some(chunk) = stream.next().await {
            if self.shutdown.load(Ordering::SeqCst) {
                return Ok(());
            }
            let chunk = chunk?;
            for event in parser.push(&chunk) {
                match serde_json::from_str::<ChannelMessage>(&event.data) {
                    Ok(message) => {
                        // Send errors mean no receivers right now
                        let _ = self.tx.send(message);
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Dropping unparseable channel event");
                    }
                }
            }
        }

        if self.shutdown.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RealtimeError::StreamEnded)
        }
    }

    /// Send a REST request with credential and timeout, mapping auth
    /// rejections before generic status errors.
    async fn request_checked(
        &self,
        request: reqwest::RequestBuilder,
    ) -> RealtimeResult<reqwest::Response> {
        let response = request
            .bearer_auth(&self.config.key)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RealtimeError::Auth(format!("request rejected with {status}")));
        }
        Ok(response.error_for_status()?)
    }
}

#[async_trait::async_trait]
impl Realtime for HostedConnector {
    async fn publish(&self, event: &str, data: serde_json::Value) -> RealtimeResult<()> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(RealtimeError::Closed);
        }
        let message = ChannelMessage::new(event, data);
        self.request_checked(self.http.post(self.config.messages_url()).json(&message))
            .await?;

        tracing::debug!(event = %message.event, "Published event to realtime channel");
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelMessage> {
        self.tx.subscribe()
    }

    async fn enter_presence(&self, member: PresenceMember) -> RealtimeResult<()> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(RealtimeError::Closed);
        }
        let body = serde_json::json!({ "action": "enter", "member": member });
        self.request_checked(self.http.post(self.config.presence_url()).json(&body))
            .await?;
        Ok(())
    }

    async fn leave_presence(&self, client_id: &str) -> RealtimeResult<()> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Err(RealtimeError::Closed);
        }
        let body = serde_json::json!({ "action": "leave", "clientId": client_id });
        self.request_checked(self.http.post(self.config.presence_url()).json(&body))
            .await?;
        Ok(())
    }

    async fn presence_members(&self) -> RealtimeResult<Vec<PresenceMember>> {
        let response = self
            .request_checked(self.http.get(self.config.presence_url()))
            .await?;
        Ok(response.json().await?)
    }

    fn connection_state(&self) -> ConnectionState {
        *self.state.read()
    }

    async fn close(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.supervisor.lock().take() {
            handle.abort();
        }
        self.set_state(ConnectionState::Closed);
        tracing::info!("Realtime connection closed");
    }
}
