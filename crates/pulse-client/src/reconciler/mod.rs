//! Typing reconciler
//!
//! Maintains the client's view of who is typing from the event stream.
//! Every start event arms a fresh expiry timer; a newer start supersedes
//! the pending timer, so only the latest one may remove the entry. The
//! timer covers the case where a participant's stop event never arrives.

use dashmap::DashMap;
use pulse_core::{ParticipantId, TypingEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Client-side typing state, fed by remote typing events.
pub struct TypingReconciler {
    inner: Arc<ReconcilerInner>,
}

struct ReconcilerInner {
    /// Participant to the generation of its latest start event.
    entries: DashMap<ParticipantId, u64>,
    /// Generation source. Never reset, so a timer from a removed entry can
    /// never match a later entry for the same participant.
    generation: AtomicU64,
    ttl: Duration,
    tx: watch::Sender<Vec<ParticipantId>>,
}

impl TypingReconciler {
    /// Create a reconciler with the given expiry TTL.
    pub fn new(ttl: Duration) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(ReconcilerInner {
                entries: DashMap::new(),
                generation: AtomicU64::new(0),
                ttl,
                tx,
            }),
        }
    }

    /// Apply one remote typing event.
    pub fn apply(&self, event: &TypingEvent) {
        if event.is_typing {
            self.start(event.participant_id.clone());
        } else {
            self.stop(&event.participant_id);
        }
    }

    fn start(&self, participant: ParticipantId) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.entries.insert(participant.clone(), generation);
        self.inner.publish();

        let inner = Arc::clone(&self.inner);
        let deadline = tokio::time::Instant::now() + inner.ttl;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let removed = inner
                .entries
                .remove_if(&participant, |_, current| *current == generation)
                .is_some();
            if removed {
                inner.publish();
            }
        });
    }

    fn stop(&self, participant: &ParticipantId) {
        if self.inner.entries.remove(participant).is_some() {
            self.inner.publish();
        }
    }

    /// Sorted list of participants currently typing.
    #[must_use]
    pub fn active(&self) -> Vec<ParticipantId> {
        let mut active: Vec<ParticipantId> = self
            .inner
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        active.sort();
        active
    }

    /// Watch the typing list; the receiver sees every change.
    #[must_use]
    pub fn watch_active(&self) -> watch::Receiver<Vec<ParticipantId>> {
        self.inner.tx.subscribe()
    }
}

impl ReconcilerInner {
    fn publish(&self) {
        let mut active: Vec<ParticipantId> = self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        active.sort();
        self.tx.send_replace(active);
    }
}
