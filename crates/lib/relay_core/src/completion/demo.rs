//! Demo completer — deterministic canned output, no network.

use async_trait::async_trait;

use super::{ChatCompleter, CompletionError};

pub const DEMO_NOTICE: &str =
    "Running in DEMO mode. Set OPENAI_API_KEY to get real responses.";

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoClient;

impl DemoClient {
    /// Canned response embedding the literal user message.
    pub fn respond(user_message: &str) -> String {
        format!(
            "[DEMO OUTPUT] This is a simulated response to your message: \"{user_message}\". \
             Configure an API key to receive real model output."
        )
    }
}

#[async_trait]
impl ChatCompleter for DemoClient {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_message: &str,
        _max_tokens: u32,
    ) -> Result<String, CompletionError> {
        Ok(Self::respond(user_message))
    }
}
