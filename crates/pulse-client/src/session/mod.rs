//! Chat session
//!
//! Wires the realtime event stream into a stream of render notices: chat
//! lines, roster changes, and typing updates. Own messages echo locally
//! before delivery is attempted, so the user always sees what they sent.

use crate::reconciler::TypingReconciler;
use parking_lot::Mutex;
use pulse_core::{events, ChatMessage, ParticipantId, PresenceMember, TypingEvent};
use pulse_realtime::{ChannelMessage, RealtimeError, SharedRealtime};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, warn};

/// Something the UI should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A chat line, either a local echo or a remote message.
    Chat {
        participant_id: String,
        text: String,
        own: bool,
    },
    /// A participant joined the room.
    Joined(String),
    /// A participant left the room.
    Left(String),
    /// The set of typing participants changed.
    TypingChanged(Vec<String>),
}

/// A live connection to the chat room.
pub struct ChatSession {
    realtime: SharedRealtime,
    participant_id: ParticipantId,
    client_id: String,
    roster: Mutex<BTreeSet<String>>,
    notices: mpsc::UnboundedSender<Notice>,
    reconciler: TypingReconciler,
}

impl ChatSession {
    /// Join the room and start consuming events.
    ///
    /// Returns the session handle and the notice stream for rendering.
    /// The presence roster is best-effort: a failed fetch leaves the
    /// roster with just this session in it.
    pub async fn start(
        realtime: SharedRealtime,
        participant_id: ParticipantId,
        client_id: String,
        typing_ttl: Duration,
    ) -> Result<(Arc<Self>, mpsc::UnboundedReceiver<Notice>), RealtimeError> {
        // Subscribe before entering so no event between the two is missed.
        let event_rx = realtime.subscribe();

        realtime
            .enter_presence(PresenceMember::new(
                participant_id.clone(),
                client_id.clone(),
            ))
            .await?;

        let mut roster = BTreeSet::new();
        roster.insert(participant_id.to_string());
        match realtime.presence_members().await {
            Ok(members) => {
                for member in members {
                    roster.insert(member.participant_id.to_string());
                }
            }
            Err(e) => warn!(error = %e, "Failed to fetch presence roster"),
        }

        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let session = Arc::new(Self {
            realtime,
            participant_id,
            client_id,
            roster: Mutex::new(roster),
            notices: notice_tx,
            reconciler: TypingReconciler::new(typing_ttl),
        });

        let typing_rx = session.reconciler.watch_active();
        tokio::spawn(Arc::clone(&session).event_loop(event_rx, typing_rx));

        Ok((session, notice_rx))
    }

    async fn event_loop(
        self: Arc<Self>,
        mut events: broadcast::Receiver<ChannelMessage>,
        mut typing: watch::Receiver<Vec<ParticipantId>>,
    ) {
        loop {
            tokio::select! {
                result = events.recv() => match result {
                    Ok(message) => self.handle_message(message),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Event stream lagged, some events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                changed = typing.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let active: Vec<String> = typing
                        .borrow_and_update()
                        .iter()
                        .map(ToString::to_string)
                        .collect();
                    if self.notices.send(Notice::TypingChanged(active)).is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Session event loop ended");
    }

    fn handle_message(&self, message: ChannelMessage) {
        match message.event.as_str() {
            events::CHAT_MESSAGE => {
                if let Ok(chat) = message.decode::<ChatMessage>() {
                    // Own messages were already echoed at send time.
                    if chat.participant_id != self.participant_id {
                        let _ = self.notices.send(Notice::Chat {
                            participant_id: chat.participant_id.to_string(),
                            text: chat.text,
                            own: false,
                        });
                    }
                }
            }
            events::TYPING => {
                if let Ok(event) = message.decode::<TypingEvent>() {
                    // The typing line never shows the local participant.
                    if event.participant_id != self.participant_id {
                        self.reconciler.apply(&event);
                    }
                }
            }
            events::PRESENCE_ENTER => {
                if let Ok(member) = message.decode::<PresenceMember>() {
                    if member.client_id == self.client_id {
                        return;
                    }
                    let added = self.roster.lock().insert(member.participant_id.to_string());
                    if added {
                        let _ = self
                            .notices
                            .send(Notice::Joined(member.participant_id.to_string()));
                    }
                }
            }
            events::PRESENCE_LEAVE => {
                if let Ok(member) = message.decode::<PresenceMember>() {
                    if member.client_id == self.client_id {
                        return;
                    }
                    let removed = self.roster.lock().remove(&member.participant_id.to_string());
                    if removed {
                        let _ = self
                            .notices
                            .send(Notice::Left(member.participant_id.to_string()));
                    }
                }
            }
            other => debug!(event = other, "Ignoring unknown event"),
        }
    }

    /// Send a chat message.
    ///
    /// The local echo renders first; delivery is then attempted and a
    /// failure only logs, it never takes the echo back.
    pub async fn send_message(&self, text: &str) {
        let message = ChatMessage::new(self.participant_id.clone(), text);
        let _ = self.notices.send(Notice::Chat {
            participant_id: self.participant_id.to_string(),
            text: text.to_string(),
            own: true,
        });

        match serde_json::to_value(&message) {
            Ok(data) => {
                if let Err(e) = self.realtime.publish(events::CHAT_MESSAGE, data).await {
                    warn!(error = %e, "Message delivery failed, kept locally");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode chat message"),
        }
    }

    /// Current roster, sorted by participant id.
    #[must_use]
    pub fn roster(&self) -> Vec<String> {
        self.roster.lock().iter().cloned().collect()
    }

    /// The participant identity this session speaks as.
    #[must_use]
    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    /// Leave the room's presence set.
    pub async fn leave(&self) {
        if let Err(e) = self.realtime.leave_presence(&self.client_id).await {
            warn!(error = %e, "Failed to leave presence");
        }
    }
}
