//! Shared test utilities for fsel integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Timing-sensitive helpers are deterministic under
//! `#[tokio::test(start_paused = true)]`.

pub mod builders;
pub mod fake_api;
pub mod fake_query_service;

pub use assertions::*;
pub use builders::*;
pub use fake_query_service::*;
