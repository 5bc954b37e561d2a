//! Typing registry
//!
//! In-memory map from participant id to the instant of their most recent
//! typing signal. The registry is the single source of truth for "who is
//! typing right now"; everything else (events, HTTP responses) derives
//! from it. State is deliberately volatile, a restart clears it.

use parking_lot::Mutex;
use pulse_core::ParticipantId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Registry of participants currently marked as typing.
///
/// All operations take the lock briefly and never hold it across an await,
/// so handler tasks and the sweep loop can share one instance freely.
#[derive(Debug, Default)]
pub struct TypingRegistry {
    entries: Mutex<HashMap<ParticipantId, Instant>>,
}

impl TypingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a typing signal stamped with the current time and return the
    /// resulting active list.
    pub fn set_typing(&self, participant: &ParticipantId, is_typing: bool) -> Vec<ParticipantId> {
        self.set_typing_at(participant, is_typing, Instant::now())
    }

    /// Record a typing signal with an explicit timestamp.
    ///
    /// A start signal inserts or refreshes the entry; a stop signal removes
    /// it. Both are idempotent. Returns the active list after the update,
    /// sorted for deterministic output.
    pub fn set_typing_at(
        &self,
        participant: &ParticipantId,
        is_typing: bool,
        now: Instant,
    ) -> Vec<ParticipantId> {
        let mut entries = self.entries.lock();
        if is_typing {
            entries.insert(participant.clone(), now);
        } else {
            entries.remove(participant);
        }

        let mut active: Vec<ParticipantId> = entries.keys().cloned().collect();
        active.sort();
        active
    }

    /// Remove every entry whose age exceeds `ttl` and return the evicted
    /// participants, sorted.
    ///
    /// An entry aged exactly `ttl` survives; eviction requires the age to
    /// be strictly greater.
    pub fn sweep_expired(&self, now: Instant, ttl: Duration) -> Vec<ParticipantId> {
        let mut evicted = Vec::new();
        {
            let mut entries = self.entries.lock();
            entries.retain(|participant, last_signal| {
                let stale = now.duration_since(*last_signal) > ttl;
                if stale {
                    evicted.push(participant.clone());
                }
                !stale
            });
        }
        evicted.sort();
        evicted
    }

    /// Currently active participants, sorted.
    #[must_use]
    pub fn active(&self) -> Vec<ParticipantId> {
        let entries = self.entries.lock();
        let mut active: Vec<ParticipantId> = entries.keys().cloned().collect();
        active.sort();
        active
    }

    /// Whether the participant currently has an entry.
    #[must_use]
    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.entries.lock().contains_key(participant)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
