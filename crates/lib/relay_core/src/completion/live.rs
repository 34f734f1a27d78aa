//! Live completer — forwards to the chat completion API.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::{ChatCompleter, CompletionError};
use crate::config::ServiceConfig;
use crate::openai::{ChatApi, ChatCompletionRequest, ChatMessage, HttpChatApi};

/// Completer bound to a credential and model.
#[derive(Clone)]
pub struct LiveClient {
    api: Arc<dyn ChatApi>,
    model: String,
}

impl fmt::Debug for LiveClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LiveClient {
    /// HTTP-backed client. Fails fast on an empty credential.
    pub fn from_config(config: &ServiceConfig, api_key: &str) -> Result<Self, CompletionError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(CompletionError::MissingCredential);
        }
        let api = HttpChatApi::new(config, api_key)?;
        Ok(Self::with_api(Arc::new(api), config.model.clone()))
    }

    /// Client over an arbitrary [`ChatApi`].
    pub fn with_api(api: Arc<dyn ChatApi>, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, system_prompt: &str, user_message: &str, max_tokens: u32) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(user_message)],
            max_tokens,
        }
    }
}

#[async_trait]
impl ChatCompleter for LiveClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
        max_tokens: u32,
    ) -> Result<String, CompletionError> {
        let request = self.build_request(system_prompt, user_message, max_tokens);
        self.api
            .create_chat_completion(&request)
            .await?
            .first_content()
    }
}
