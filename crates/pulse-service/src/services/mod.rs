//! Business logic services
//!
//! Services that handle typing signals and run the background sweep.

pub mod sweeper;
pub mod typing;

// Re-export all services for convenience
pub use sweeper::TypingSweeper;
pub use typing::TypingService;
