//! fsel: searchable multi-value filter selector.
//!
//! The selector logic lives in `fsel-core` and the HTTP transport in
//! `fsel-remote`. This crate adds the line-mode driver: stdin commands in,
//! plain-text selection views out.
//!
//! # Architecture
//!
//! ```text
//! stdin ──► Command ──► FilterSelector ──► HttpQueryService ──► API v3
//!                            │
//! stdout ◄── display ◄───────┘
//! ```

pub mod commands;
pub mod display;

pub use fsel_core;
pub use fsel_remote;
