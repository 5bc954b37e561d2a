//! # pulse-service
//!
//! Application layer containing the typing registry, services, and DTOs.

pub mod dto;
pub mod registry;
pub mod services;

pub use dto::{HealthResponse, TypingSnapshotResponse, TypingStatusRequest, TypingStatusResponse};
pub use registry::TypingRegistry;
pub use services::{TypingService, TypingSweeper};
