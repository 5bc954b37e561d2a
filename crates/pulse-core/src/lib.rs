//! # pulse-core
//!
//! Domain layer containing participant identity and the wire events shared
//! by the backend and the client. This crate has zero dependencies on
//! infrastructure (HTTP, realtime transport, etc.).

pub mod events;
pub mod participant;

// Re-export commonly used types at crate root
pub use events::{ChatMessage, PresenceMember, TypingEvent};
pub use participant::{generate_client_id, ParticipantId, ParticipantIdError};
