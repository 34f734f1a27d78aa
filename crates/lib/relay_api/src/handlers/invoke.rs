//! Function-runtime endpoint — the whole invocation record arrives as JSON.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::error;

use crate::AppState;
use crate::envelope::Envelope;
use crate::error::AppError;
use crate::invocation::Invocation;

/// `POST /invoke` — body is `{"method": "...", "body": "<json text>" | {...}}`.
pub async fn invoke_handler(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Envelope>) {
    let invocation = match serde_json::from_slice::<Invocation>(&body) {
        Ok(invocation) => invocation,
        Err(e) => {
            let err = AppError::Upstream(format!("Invalid invocation record: {e}"));
            error!(error = %err, "invocation failed");
            return (err.status(), Json(err.to_envelope()));
        }
    };

    let (status, envelope) = state.handler.handle(invocation).await;
    (status, Json(envelope))
}
