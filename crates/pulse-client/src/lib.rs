//! # pulse-client
//!
//! Terminal chat client. Consumes realtime events, reconciles the typing
//! indicator, and signals its own typing through the backend.

pub mod reconciler;
pub mod session;
pub mod typing;

pub use reconciler::TypingReconciler;
pub use session::{ChatSession, Notice};
pub use typing::{HttpTypingSink, TypingPublisher, TypingSink};
