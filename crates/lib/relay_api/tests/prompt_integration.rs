//! Integration test — build the router around demo and stubbed live
//! completers and drive it with `oneshot`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use relay_api::{AppState, router};
use relay_core::completion::{Completer, CompletionError, DemoClient, LiveClient};
use relay_core::config::ServiceConfig;
use relay_core::openai::{ChatApi, ChatCompletionRequest, ChatCompletionResponse, Role};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Stub chat API that records every request it receives.
#[derive(Default)]
struct RecordingApi {
    response: ChatCompletionResponse,
    seen: Mutex<Vec<ChatCompletionRequest>>,
}

#[async_trait]
impl ChatApi for RecordingApi {
    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }
}

fn demo_app() -> Router {
    router(AppState::new(Completer::Demo(DemoClient)))
}

fn live_app(api: Arc<RecordingApi>) -> Router {
    let client = LiveClient::with_api(api, "test-model");
    router(AppState::new(Completer::Live(client)))
}

async fn send(app: Router, method: &str, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json: Value = serde_json::from_slice(&bytes).expect("parse JSON");
    (status, json)
}

fn valid_body() -> String {
    json!({
        "systemPrompt": "You are a helpful assistant.",
        "userMessage": "Hello, does this work?",
        "maxTokens": 100
    })
    .to_string()
}

#[tokio::test]
async fn non_post_methods_get_405() {
    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let (status, json) = send(demo_app(), method, "/api/prompt", valid_body()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(json, json!({"error": "Method not allowed"}));
    }
}

#[tokio::test]
async fn missing_fields_get_400_in_both_modes() {
    let bodies = [
        json!({"userMessage": "hi"}),
        json!({"systemPrompt": "sys"}),
        json!({"systemPrompt": "", "userMessage": "hi"}),
        json!({"systemPrompt": "sys", "userMessage": ""}),
    ];

    for body in bodies {
        let (status, json) = send(demo_app(), "POST", "/", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"success": false, "error": "missing required parameters"}));

        let api = Arc::new(RecordingApi::default());
        let (status, _) = send(live_app(api.clone()), "POST", "/", body.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(api.seen.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn demo_mode_echoes_user_message() {
    let (status, json) = send(demo_app(), "POST", "/api/prompt", valid_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json.get("error").is_none());
    assert!(json["message"].as_str().expect("message").contains("DEMO"));
    let data = json["data"].as_str().expect("data");
    assert!(data.starts_with("[DEMO OUTPUT]"), "unexpected data: {data}");
    assert!(data.contains("\"Hello, does this work?\""));
}

#[tokio::test]
async fn sentinel_key_runs_demo_without_network() {
    let config = ServiceConfig::demo().with_api_key("demo-key");
    let app = router(AppState::from_config(&config).expect("state"));

    let (status, json) = send(app, "POST", "/", valid_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_str().unwrap().contains("Hello, does this work?"));
}

#[tokio::test]
async fn live_mode_returns_first_choice() {
    let api = Arc::new(RecordingApi {
        response: ChatCompletionResponse::single("X"),
        ..Default::default()
    });

    let (status, json) = send(live_app(api.clone()), "POST", "/api/prompt", valid_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"success": true, "data": "X"}));

    let seen = api.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].model, "test-model");
    assert_eq!(seen[0].max_tokens, 100);
    assert_eq!(seen[0].messages.len(), 2);
    assert_eq!(seen[0].messages[0].role, Role::System);
    assert_eq!(seen[0].messages[0].content, "You are a helpful assistant.");
    assert_eq!(seen[0].messages[1].role, Role::User);
    assert_eq!(seen[0].messages[1].content, "Hello, does this work?");
}

#[tokio::test]
async fn live_mode_defaults_max_tokens() {
    let api = Arc::new(RecordingApi {
        response: ChatCompletionResponse::single("ok"),
        ..Default::default()
    });
    let body = json!({"systemPrompt": "s", "userMessage": "u"}).to_string();

    let (status, _) = send(live_app(api.clone()), "POST", "/", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(api.seen.lock().unwrap()[0].max_tokens, 1000);
}

#[tokio::test]
async fn live_mode_zero_choices_is_500() {
    let api = Arc::new(RecordingApi::default());

    let (status, json) = send(live_app(api), "POST", "/api/prompt", valid_body()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn malformed_body_is_500() {
    let (status, json) = send(demo_app(), "POST", "/api/prompt", "{not json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn non_utf8_body_is_500_without_upstream_call() {
    let api = Arc::new(RecordingApi {
        response: ChatCompletionResponse::single("X"),
        ..Default::default()
    });
    let body = b"{\"systemPrompt\":\"s\",\"userMessage\":\"caf\xE9\"}".to_vec();

    let (status, json) = send(live_app(api.clone()), "POST", "/api/prompt", body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid request body"));
    assert!(api.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cors_preflight_on_function_route_gets_405() {
    for uri in ["/", "/api/prompt"] {
        let req = Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header("origin", "https://example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let resp = demo_app().oneshot(req).await.expect("request");
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json: Value = serde_json::from_slice(&bytes).expect("parse JSON");
        assert_eq!(json, json!({"error": "Method not allowed"}));
    }
}

#[tokio::test]
async fn function_route_allows_any_origin() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/prompt")
        .header("origin", "https://example.com")
        .body(Body::from(valid_body()))
        .unwrap();

    let resp = demo_app().oneshot(req).await.expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn cors_preflight_on_health_is_answered() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/health")
        .header("origin", "https://example.com")
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .unwrap();

    let resp = demo_app().oneshot(req).await.expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn invoke_accepts_object_and_string_bodies() {
    let object = json!({
        "method": "POST",
        "body": {"systemPrompt": "s", "userMessage": "object body"}
    });
    let (status, json) = send(demo_app(), "POST", "/invoke", object.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_str().unwrap().contains("\"object body\""));

    let text = json!({
        "method": "POST",
        "body": json!({"systemPrompt": "s", "userMessage": "string body"}).to_string()
    });
    let (status, json) = send(demo_app(), "POST", "/invoke", text.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].as_str().unwrap().contains("\"string body\""));
}

#[tokio::test]
async fn invoke_honours_record_method() {
    let record = json!({"method": "GET", "body": {}});
    let (status, json) = send(demo_app(), "POST", "/invoke", record.to_string()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json, json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn invoke_rejects_malformed_record() {
    let (status, json) = send(demo_app(), "POST", "/invoke", "[]").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn health_reports_mode() {
    let (status, json) = send(demo_app(), "GET", "/api/health", Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["mode"], "demo");
    assert_eq!(json["version"], relay_core::version());

    let (_, json) = send(
        live_app(Arc::new(RecordingApi::default())),
        "GET",
        "/api/health",
        Body::empty(),
    )
    .await;
    assert_eq!(json["mode"], "live");
}
