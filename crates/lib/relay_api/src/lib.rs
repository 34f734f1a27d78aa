//! # relay_api
//!
//! HTTP surface for Relay.

pub mod envelope;
pub mod error;
pub mod function;
pub mod handlers;
pub mod invocation;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use axum::routing::{any, get, post};
use relay_core::completion::{Completer, CompletionError};
use relay_core::config::ServiceConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::function::RequestHandler;
use crate::handlers::{health, invoke, prompt};

pub const ROUTE_ROOT: &str = "/";
pub const ROUTE_PROMPT: &str = "/api/prompt";
pub const ROUTE_INVOKE: &str = "/invoke";
pub const ROUTE_HEALTH: &str = "/api/health";

/// Shared application state passed to all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub handler: RequestHandler,
}

impl AppState {
    pub fn new(completer: Completer) -> Self {
        Self {
            handler: RequestHandler::new(completer),
        }
    }

    /// Select the completer from `config` once.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, CompletionError> {
        Ok(Self::new(Completer::from_config(config)?))
    }
}

/// Builds the Axum router with all routes and shared state.
///
/// Function routes skip `CorsLayer` so `OPTIONS` preflights reach the
/// handler and get 405; they only carry `Access-Control-Allow-Origin`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let function = Router::new()
        .route(ROUTE_ROOT, any(prompt::prompt_handler))
        .route(ROUTE_PROMPT, any(prompt::prompt_handler))
        .route(ROUTE_INVOKE, post(invoke::invoke_handler))
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ));

    let api = Router::new()
        .route(ROUTE_HEALTH, get(health::health_handler))
        .layer(cors);

    Router::new()
        .merge(function)
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
