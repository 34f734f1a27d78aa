//! Invocation record and prompt body parsing.

use relay_core::completion::DEFAULT_MAX_TOKENS;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult, MISSING_PARAMETERS};

/// One function invocation as delivered by the runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    pub method: String,
    #[serde(default)]
    pub body: InvocationBody,
}

/// Body is raw text to decode, or JSON the runtime already parsed.
///
/// `Bytes` holds an HTTP body that is not valid UTF-8; it only ever fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvocationBody {
    Text(String),
    Json(Value),
    #[serde(skip)]
    Bytes(Vec<u8>),
}

impl Default for InvocationBody {
    fn default() -> Self {
        InvocationBody::Text(String::new())
    }
}

impl InvocationBody {
    /// Raw HTTP body. Decoded as text when it is valid UTF-8.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => InvocationBody::Text(text),
            Err(e) => InvocationBody::Bytes(e.into_bytes()),
        }
    }
}

impl Invocation {
    pub fn new(method: impl Into<String>, body: InvocationBody) -> Self {
        Self {
            method: method.into(),
            body,
        }
    }

    pub fn post_text(body: impl Into<String>) -> Self {
        Self::new("POST", InvocationBody::Text(body.into()))
    }

    pub fn post_json(body: Value) -> Self {
        Self::new("POST", InvocationBody::Json(body))
    }

    pub fn is_post(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST")
    }
}

/// Prompt fields as sent by the caller. Presence is checked in [`PromptRequest::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub system_prompt: Option<String>,
    pub user_message: Option<String>,
    pub max_tokens: Option<i64>,
}

/// Prompt fields after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_prompt: String,
    pub user_message: String,
    pub max_tokens: u32,
}

impl InvocationBody {
    pub fn parse(self) -> AppResult<PromptRequest> {
        let req = match self {
            InvocationBody::Text(text) => serde_json::from_str(&text)?,
            InvocationBody::Json(value) => serde_json::from_value(value)?,
            InvocationBody::Bytes(bytes) => serde_json::from_slice(&bytes)?,
        };
        Ok(req)
    }
}

impl PromptRequest {
    pub fn validate(self) -> AppResult<Prompt> {
        let system_prompt = self.system_prompt.filter(|s| !s.is_empty());
        let user_message = self.user_message.filter(|s| !s.is_empty());
        let (Some(system_prompt), Some(user_message)) = (system_prompt, user_message) else {
            return Err(AppError::Validation(MISSING_PARAMETERS.into()));
        };

        let max_tokens = match self.max_tokens {
            None => DEFAULT_MAX_TOKENS,
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::Validation("maxTokens must be a positive integer".into()))?,
        };

        Ok(Prompt {
            system_prompt,
            user_message,
            max_tokens,
        })
    }
}
