//! Integration test utilities for the typing status server
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API with an in-process realtime connector, no external
//! services required.

pub mod helpers;
pub mod fixtures;

pub use helpers::*;
pub use fixtures::*;
