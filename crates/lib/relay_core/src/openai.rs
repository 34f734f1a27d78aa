//! OpenAI-compatible chat completion API.
//!
//! [`ChatApi`] is the seam to the external collaborator. [`HttpChatApi`] is
//! the production implementation over `reqwest`; tests substitute stubs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::completion::CompletionError;
use crate::config::ServiceConfig;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One role-tagged entry of the message sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

/// Generated message. `content` is null for refusals and tool calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Response carrying a single choice with `content`.
    pub fn single(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: Some(content.into()),
                },
            }],
        }
    }

    /// Content of the first choice.
    pub fn first_content(self) -> Result<String, CompletionError> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::InvalidResponse("response contained no choices".into()))?
            .message
            .content
            .ok_or_else(|| CompletionError::InvalidResponse("first choice has no content".into()))
    }
}

/// External chat-completion collaborator.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CompletionError>;
}

/// [`ChatApi`] over HTTP. Single attempt, no retry.
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    url: String,
    api_key: String,
}

impl HttpChatApi {
    pub fn new(config: &ServiceConfig, api_key: impl Into<String>) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CompletionError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.chat_completions_url(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        debug!(url = %self.url, model = %request.model, max_tokens = request.max_tokens, "sending chat completion");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(format!("chat completion request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<ChatCompletionResponse>()
            .await
            .map_err(|e| CompletionError::InvalidResponse(format!("chat completion parse error: {e}")))
    }
}
