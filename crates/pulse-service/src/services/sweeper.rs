//! Typing sweeper
//!
//! Background loop that evicts typing entries whose last signal is older
//! than the TTL, then broadcasts a stop event for each evicted participant
//! so clients that missed the original stop still converge.

use crate::registry::TypingRegistry;
use crate::services::typing::publish_typing_event;
use pulse_core::TypingEvent;
use pulse_realtime::SharedRealtime;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Periodic eviction loop for the typing registry.
pub struct TypingSweeper {
    registry: Arc<TypingRegistry>,
    realtime: SharedRealtime,
    ttl: Duration,
    sweep_interval: Duration,
    running: Arc<AtomicBool>,
}

impl TypingSweeper {
    /// Create a new TypingSweeper
    pub fn new(
        registry: Arc<TypingRegistry>,
        realtime: SharedRealtime,
        ttl: Duration,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            registry,
            realtime,
            ttl,
            sweep_interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the sweep loop in a background task.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Typing sweeper already running");
            return;
        }

        info!(
            ttl_ms = self.ttl.as_millis() as u64,
            interval_ms = self.sweep_interval.as_millis() as u64,
            "Typing sweeper started"
        );

        tokio::spawn(async move {
            self.run().await;
        });
    }

    async fn run(&self) {
        let mut ticker = interval(self.sweep_interval);
        // A delayed tick should not trigger a burst of catch-up sweeps.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval fires immediately; skip it so
        // entries get at least one full interval before eviction runs.
        ticker.tick().await;

        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                break;
            }
            let evicted = self.sweep_once(Instant::now()).await;
            if evicted > 0 {
                info!(evicted, "Typing sweep evicted stale entries");
            }
        }

        info!("Typing sweeper stopped");
    }

    /// Run one sweep pass at the given clock reading.
    ///
    /// Returns how many entries were evicted. Each eviction gets its own
    /// stop broadcast; one failed publish does not block the rest.
    pub async fn sweep_once(&self, now: Instant) -> usize {
        let evicted = self.registry.sweep_expired(now, self.ttl);
        if evicted.is_empty() {
            debug!("Typing sweep found nothing to evict");
            return 0;
        }

        let count = evicted.len();
        for participant in evicted {
            let event = TypingEvent::stopped(participant.clone());
            if let Err(e) = publish_typing_event(self.realtime.as_ref(), &event).await {
                warn!(
                    participant = %participant,
                    error = %e,
                    "Failed to publish eviction stop event"
                );
            }
        }
        count
    }

    /// Signal the loop to exit after its current tick.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Typing sweeper stopping");
        }
    }

    /// Whether the sweep loop is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for TypingSweeper {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
