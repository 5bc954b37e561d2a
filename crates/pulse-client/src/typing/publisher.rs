//! Typing publisher
//!
//! Turns raw keystrokes into a throttled stream of typing signals.
//! A start signal goes out at most once per refresh interval while typing
//! continues, and a stop signal goes out once input has been idle long
//! enough or the message is sent.

use crate::typing::sink::TypingSink;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// How often a start signal is refreshed while typing continues.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(1000);

/// How long input may be idle before a stop signal goes out.
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Client-side typing signal gate.
pub struct TypingPublisher {
    inner: Arc<PublisherInner>,
}

struct PublisherInner {
    sink: Arc<dyn TypingSink>,
    refresh_interval: Duration,
    idle_timeout: Duration,
    /// When the last start signal went out, None once a stop went out.
    last_sent: Mutex<Option<Instant>>,
    /// Bumped on every keystroke and stop; an idle timer only fires when
    /// its generation is still the latest.
    idle_generation: AtomicU64,
}

impl TypingPublisher {
    /// Create a publisher with the default timing.
    pub fn new(sink: Arc<dyn TypingSink>) -> Self {
        Self::with_timing(sink, REFRESH_INTERVAL, IDLE_TIMEOUT)
    }

    /// Create a publisher with explicit timing.
    pub fn with_timing(
        sink: Arc<dyn TypingSink>,
        refresh_interval: Duration,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(PublisherInner {
                sink,
                refresh_interval,
                idle_timeout,
                last_sent: Mutex::new(None),
                idle_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Record a keystroke.
    ///
    /// Sends a start signal if none went out within the refresh interval,
    /// and arms an idle timer that sends the stop signal once keystrokes
    /// cease. The throttle counts attempts, not successes, so a dead
    /// backend is not hammered on every keystroke.
    pub async fn keystroke(&self) {
        let generation = self.inner.idle_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let should_send = {
            let mut last = self.inner.last_sent.lock();
            match *last {
                Some(at) if at.elapsed() < self.inner.refresh_interval => false,
                _ => {
                    *last = Some(Instant::now());
                    true
                }
            }
        };
        if should_send {
            self.inner.send(true).await;
        }

        let inner = Arc::clone(&self.inner);
        let deadline = Instant::now() + inner.idle_timeout;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // A newer keystroke or an explicit stop supersedes this timer.
            if inner.idle_generation.load(Ordering::SeqCst) == generation {
                inner.last_sent.lock().take();
                inner.send(false).await;
            }
        });
    }

    /// Send a stop signal now, if a start signal is outstanding.
    ///
    /// Called when the message is sent or the client exits.
    pub async fn stop(&self) {
        self.inner.idle_generation.fetch_add(1, Ordering::SeqCst);
        let had_signal = self.inner.last_sent.lock().take().is_some();
        if had_signal {
            self.inner.send(false).await;
        }
    }
}

impl PublisherInner {
    async fn send(&self, is_typing: bool) {
        if let Err(e) = self.sink.send_typing(is_typing).await {
            warn!(is_typing, error = %e, "Failed to deliver typing signal");
        }
    }
}
