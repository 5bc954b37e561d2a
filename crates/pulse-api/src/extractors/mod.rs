//! Axum extractors for request handling
//!
//! Custom extractors for input validation.

mod validated;

pub use validated::ValidatedJson;
