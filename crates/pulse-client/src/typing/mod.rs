//! Outbound typing signals
//!
//! The publisher throttles keystrokes into signals; sinks carry them to
//! the backend.

pub mod publisher;
pub mod sink;

pub use publisher::{TypingPublisher, IDLE_TIMEOUT, REFRESH_INTERVAL};
pub use sink::{HttpTypingSink, SinkError, TypingSink};
