//! Test fixtures
//!
//! A recording realtime implementation for driving the API without a
//! provider, and a stub hosted provider for exercising the real connector.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures_util::Stream;
use parking_lot::Mutex;
use pulse_core::{PresenceMember, TypingEvent};
use pulse_realtime::{ChannelMessage, ConnectionState, Realtime, RealtimeError, RealtimeResult};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

// ============================================================================
// Recording realtime
// ============================================================================

/// In-process [`Realtime`] implementation that records every publish.
///
/// Publishes loop back to subscribers like the local bus, and failure
/// injection lets tests exercise the publish-error paths.
pub struct RecordingRealtime {
    tx: broadcast::Sender<ChannelMessage>,
    published: Mutex<Vec<ChannelMessage>>,
    members: Mutex<Vec<PresenceMember>>,
    fail_publishes: AtomicBool,
    state: Mutex<ConnectionState>,
}

impl RecordingRealtime {
    pub fn new() -> Arc<Self> {
        Self::with_state(ConnectionState::Connected)
    }

    pub fn with_state(state: ConnectionState) -> Arc<Self> {
        let (tx, _) = broadcast::channel(256);
        Arc::new(Self {
            tx,
            published: Mutex::new(Vec::new()),
            members: Mutex::new(Vec::new()),
            fail_publishes: AtomicBool::new(false),
            state: Mutex::new(state),
        })
    }

    /// Make every subsequent publish fail
    pub fn set_fail_publishes(&self, fail: bool) {
        self.fail_publishes.store(fail, Ordering::SeqCst);
    }

    /// Change the reported connection state
    pub fn set_connection_state(&self, state: ConnectionState) {
        *self.state.lock() = state;
    }

    /// Every message published so far, in order
    pub fn published(&self) -> Vec<ChannelMessage> {
        self.published.lock().clone()
    }

    /// Every successfully published typing event, in order
    pub fn typing_events(&self) -> Vec<TypingEvent> {
        self.published
            .lock()
            .iter()
            .filter(|message| message.event == pulse_core::events::TYPING)
            .filter_map(|message| message.decode().ok())
            .collect()
    }
}

#[async_trait]
impl Realtime for RecordingRealtime {
    async fn publish(&self, event: &str, data: serde_json::Value) -> RealtimeResult<()> {
        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(RealtimeError::StreamEnded);
        }
        let message = ChannelMessage::new(event, data);
        self.published.lock().push(message.clone());
        let _ = self.tx.send(message);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelMessage> {
        self.tx.subscribe()
    }

    async fn enter_presence(&self, member: PresenceMember) -> RealtimeResult<()> {
        let mut members = self.members.lock();
        members.retain(|m| m.client_id != member.client_id);
        members.push(member);
        Ok(())
    }

    async fn leave_presence(&self, client_id: &str) -> RealtimeResult<()> {
        self.members.lock().retain(|m| m.client_id != client_id);
        Ok(())
    }

    async fn presence_members(&self) -> RealtimeResult<Vec<PresenceMember>> {
        Ok(self.members.lock().clone())
    }

    fn connection_state(&self) -> ConnectionState {
        *self.state.lock()
    }

    async fn close(&self) {
        *self.state.lock() = ConnectionState::Closed;
    }
}

// ============================================================================
// Stub hosted provider
// ============================================================================

struct StubState {
    key: String,
    tx: broadcast::Sender<ChannelMessage>,
    received: Mutex<Vec<ChannelMessage>>,
    members: Mutex<Vec<PresenceMember>>,
}

/// Minimal hosted-provider lookalike speaking the connector's wire
/// protocol: REST publish, presence actions, and an SSE event stream.
pub struct StubProvider {
    pub addr: SocketAddr,
    state: Arc<StubState>,
    _handle: JoinHandle<()>,
}

impl StubProvider {
    /// Start the stub on an ephemeral port, accepting the given key
    pub async fn start(key: &str) -> Result<Self> {
        let (tx, _) = broadcast::channel(256);
        let state = Arc::new(StubState {
            key: key.to_string(),
            tx,
            received: Mutex::new(Vec::new()),
            members: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/channels/:channel/messages", post(publish_message))
            .route("/channels/:channel/sse", get(sse_stream))
            .route(
                "/channels/:channel/presence",
                post(presence_action).get(presence_members),
            )
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Base URL the connector should use as its REST URL
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every message the stub accepted over REST, in order
    pub fn received(&self) -> Vec<ChannelMessage> {
        self.state.received.lock().clone()
    }

    /// Current presence set held by the stub
    pub fn members(&self) -> Vec<PresenceMember> {
        self.state.members.lock().clone()
    }

    /// Push a message to all SSE subscribers, as another client would
    pub fn broadcast(&self, message: ChannelMessage) {
        let _ = self.state.tx.send(message);
    }
}

fn authorize(state: &StubState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", state.key);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn publish_message(
    State(state): State<Arc<StubState>>,
    Path(_channel): Path<String>,
    headers: HeaderMap,
    Json(message): Json<ChannelMessage>,
) -> Result<StatusCode, StatusCode> {
    authorize(&state, &headers)?;
    state.received.lock().push(message.clone());
    let _ = state.tx.send(message);
    Ok(StatusCode::OK)
}

async fn sse_stream(
    State(state): State<Arc<StubState>>,
    Path(_channel): Path<String>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    authorize(&state, &headers)?;

    let rx = state.tx.subscribe();
    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(message) => {
                    let json = serde_json::to_string(&message).ok()?;
                    return Some((Ok(Event::default().data(json)), rx));
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

async fn presence_action(
    State(state): State<Arc<StubState>>,
    Path(_channel): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<StatusCode, StatusCode> {
    authorize(&state, &headers)?;

    match body["action"].as_str() {
        Some("enter") => {
            let member: PresenceMember = serde_json::from_value(body["member"].clone())
                .map_err(|_| StatusCode::BAD_REQUEST)?;
            let mut members = state.members.lock();
            members.retain(|m| m.client_id != member.client_id);
            members.push(member);
            Ok(StatusCode::OK)
        }
        Some("leave") => {
            let client_id = body["clientId"]
                .as_str()
                .ok_or(StatusCode::BAD_REQUEST)?
                .to_string();
            state.members.lock().retain(|m| m.client_id != client_id);
            Ok(StatusCode::OK)
        }
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

async fn presence_members(
    State(state): State<Arc<StubState>>,
    Path(_channel): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<PresenceMember>>, StatusCode> {
    authorize(&state, &headers)?;
    Ok(Json(state.members.lock().clone()))
}
