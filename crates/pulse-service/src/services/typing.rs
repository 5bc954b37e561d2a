//! Typing service
//!
//! Applies typing signals to the registry and tells the room about them.
//! The registry write always wins: a dead realtime provider degrades the
//! notification, never the recorded state.

use crate::registry::TypingRegistry;
use pulse_core::{events, ParticipantId, TypingEvent};
use pulse_realtime::{Realtime, RealtimeResult, SharedRealtime};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Service handling typing signals from clients.
pub struct TypingService {
    registry: Arc<TypingRegistry>,
    realtime: SharedRealtime,
}

impl TypingService {
    /// Create a new TypingService
    pub fn new(registry: Arc<TypingRegistry>, realtime: SharedRealtime) -> Self {
        Self { registry, realtime }
    }

    /// Apply a typing signal and broadcast it.
    ///
    /// Returns the active list as of this update. The publish is
    /// best-effort: failures are logged and the signal still counts.
    #[instrument(skip(self))]
    pub async fn signal(&self, participant: ParticipantId, is_typing: bool) -> Vec<ParticipantId> {
        let active = self.registry.set_typing(&participant, is_typing);

        let event = if is_typing {
            TypingEvent::started(participant.clone())
        } else {
            TypingEvent::stopped(participant.clone())
        };
        if let Err(e) = publish_typing_event(self.realtime.as_ref(), &event).await {
            warn!(
                participant = %participant,
                error = %e,
                "Failed to publish typing event, registry state kept"
            );
        }

        info!(
            participant = %participant,
            is_typing,
            active = active.len(),
            "Typing signal recorded"
        );
        active
    }

    /// Read-only view of who is typing right now.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ParticipantId> {
        self.registry.active()
    }
}

/// Encode and publish a typing event to the room channel.
pub(crate) async fn publish_typing_event(
    realtime: &dyn Realtime,
    event: &TypingEvent,
) -> RealtimeResult<()> {
    let data = serde_json::to_value(event)?;
    realtime.publish(events::TYPING, data).await
}
