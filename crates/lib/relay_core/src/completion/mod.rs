//! Completion module — turns a system prompt and user message into text.
//!
//! # Public API
//!
//! - [`ChatCompleter`] — the single `complete` capability
//! - [`Completer`] — demo or live, selected once from [`ServiceConfig`]
//! - [`DemoClient`] — canned responses, no network
//! - [`LiveClient`] — delegates to a [`crate::openai::ChatApi`]

pub mod demo;
pub mod live;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::ServiceConfig;

pub use demo::DemoClient;
pub use live::LiveClient;

/// Token ceiling used when the caller does not supply one.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Errors that can occur while producing a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("API key is required for live completions")]
    MissingCredential,

    #[error("{0}")]
    Transport(String),

    #[error("Chat API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid chat API response: {0}")]
    InvalidResponse(String),
}

/// Which kind of completer is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Demo,
    Live,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Demo => "demo",
            Mode::Live => "live",
        }
    }
}

/// Capability shared by demo and live completers.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        max_tokens: u32,
    ) -> Result<String, CompletionError>;
}

/// The completer chosen at construction. Never changes afterwards.
#[derive(Debug, Clone)]
pub enum Completer {
    Demo(DemoClient),
    Live(LiveClient),
}

impl Completer {
    /// Pick demo or live from the configured credential.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, CompletionError> {
        if config.is_demo() {
            info!("no API key configured, running in demo mode");
            return Ok(Completer::Demo(DemoClient));
        }

        let api_key = config.api_key.as_deref().unwrap_or_default();
        let client = LiveClient::from_config(config, api_key)?;
        info!(model = %client.model(), "running in live mode");
        Ok(Completer::Live(client))
    }

    pub fn mode(&self) -> Mode {
        match self {
            Completer::Demo(_) => Mode::Demo,
            Completer::Live(_) => Mode::Live,
        }
    }

    /// Notice attached to envelopes produced in demo mode.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Completer::Demo(_) => Some(demo::DEMO_NOTICE),
            Completer::Live(_) => None,
        }
    }
}

#[async_trait]
impl ChatCompleter for Completer {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        max_tokens: u32,
    ) -> Result<String, CompletionError> {
        match self {
            Completer::Demo(c) => c.complete(system_prompt, user_message, max_tokens).await,
            Completer::Live(c) => c.complete(system_prompt, user_message, max_tokens).await,
        }
    }
}
