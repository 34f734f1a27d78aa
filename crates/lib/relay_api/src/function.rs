//! Request handler — method check, body parsing, validation, dispatch.
//!
//! Order per invocation:
//! 1. Reject anything but `POST` (405)
//! 2. Decode the body (500 on malformed JSON)
//! 3. Require `systemPrompt` and `userMessage` (400)
//! 4. Complete through the demo or live completer (500 on failure)

use std::sync::Arc;

use axum::http::StatusCode;
use relay_core::completion::{ChatCompleter, Completer, Mode};
use tracing::{debug, error, warn};

use crate::envelope::Envelope;
use crate::error::{AppError, AppResult};
use crate::invocation::Invocation;

/// Handler bound to one completer for its whole lifetime.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    completer: Arc<Completer>,
}

impl RequestHandler {
    pub fn new(completer: Completer) -> Self {
        Self {
            completer: Arc::new(completer),
        }
    }

    pub fn mode(&self) -> Mode {
        self.completer.mode()
    }

    /// Run one invocation to a status and envelope. Never fails.
    pub async fn handle(&self, invocation: Invocation) -> (StatusCode, Envelope) {
        match self.try_handle(invocation).await {
            Ok(envelope) => (StatusCode::OK, envelope),
            Err(e) => {
                match &e {
                    AppError::MethodNotAllowed => debug!("rejected non-POST invocation"),
                    AppError::Validation(m) => warn!(reason = %m, "invalid invocation"),
                    AppError::Upstream(m) => error!(error = %m, "invocation failed"),
                }
                (e.status(), e.to_envelope())
            }
        }
    }

    async fn try_handle(&self, invocation: Invocation) -> AppResult<Envelope> {
        if !invocation.is_post() {
            return Err(AppError::MethodNotAllowed);
        }

        let prompt = invocation.body.parse()?.validate()?;

        debug!(
            mode = self.mode().as_str(),
            max_tokens = prompt.max_tokens,
            "dispatching completion"
        );
        let text = self
            .completer
            .complete(&prompt.system_prompt, &prompt.user_message, prompt.max_tokens)
            .await?;

        Ok(match self.completer.notice() {
            Some(notice) => Envelope::ok_with_message(text, notice),
            None => Envelope::ok(text),
        })
    }
}
