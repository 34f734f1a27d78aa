//! # relay_core
//!
//! Core completion logic for Relay: configuration, the demo and live
//! completers, and the chat API client.

pub mod completion;
pub mod config;
pub mod openai;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
