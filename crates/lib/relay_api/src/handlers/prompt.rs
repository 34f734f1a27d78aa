//! Function endpoint — plain HTTP request in, envelope out.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};

use crate::AppState;
use crate::envelope::Envelope;
use crate::invocation::{Invocation, InvocationBody};

/// `ANY /` and `ANY /api/prompt` — the raw body is decoded as JSON text.
/// A body that is not UTF-8 fails to parse like any other malformed JSON.
pub async fn prompt_handler(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> (StatusCode, Json<Envelope>) {
    let body = InvocationBody::from_bytes(body.to_vec());
    let (status, envelope) = state
        .handler
        .handle(Invocation::new(method.as_str(), body))
        .await;
    (status, Json(envelope))
}
