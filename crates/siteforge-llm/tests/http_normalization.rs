//! Wire-level tests for the backend adapters against a local mock server
//!
//! Each test spins up an axum app on 127.0.0.1:0 that mimics one vendor's auth
//! scheme and response envelope.

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::{Value, json};
use siteforge_llm::{
    BackendDescriptor, BackendKind, ProviderError, ProviderGateway, ProviderRequest,
    ProviderRouter,
};
use siteforge_utils::types::TaskCategory;
use std::collections::HashMap;
use std::time::Duration;

const KEY: &str = "test-key";

async fn anthropic(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    if headers.get("anthropic-version").is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "no version"})));
    }
    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "content": [
                {"type": "text", "text": "anthropic:"},
                {"type": "text", "text": prompt}
            ]
        })),
    )
}

async fn openai(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {KEY}");
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    let title = headers
        .get("x-title")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    let prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": format!("{title}:{prompt}")}}]
        })),
    )
}

async fn gemini(
    Path(action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if query.get("key").map(String::as_str) != Some(KEY) {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "bad key"})));
    }
    if action != "gemini-test:generateContent" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": action})));
    }
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{"content": {"parts": [{"text": "gemini:"}, {"text": prompt}]}}]
        })),
    )
}

async fn quota() -> (StatusCode, Json<Value>) {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({"error": {"message": "quota exceeded"}})),
    )
}

async fn garbage() -> (StatusCode, String) {
    (StatusCode::OK, "<html>not json</html>".to_string())
}

async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/anthropic", post(anthropic))
        .route("/openai", post(openai))
        .route("/gemini/models/{action}", post(gemini))
        .route("/quota", post(quota))
        .route("/garbage", post(garbage));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn descriptor(id: &str, kind: BackendKind, url: String, key: &str) -> BackendDescriptor {
    BackendDescriptor {
        id: id.to_string(),
        kind,
        base_url: url,
        model: "gemini-test".to_string(),
        api_key: Some(key.to_string()),
        max_tokens: 128,
        temperature: 0.2,
    }
}

fn router_for(backends: Vec<BackendDescriptor>) -> ProviderRouter {
    ProviderRouter::new(backends, Duration::from_secs(10)).unwrap()
}

/// Test that the Anthropic adapter sends x-api-key and joins text blocks
#[tokio::test]
async fn test_anthropic_custom_header_auth() {
    let base = spawn_mock().await;
    let backend = descriptor("anthropic", BackendKind::Anthropic, format!("{base}/anthropic"), KEY);
    let router = router_for(vec![backend.clone()]);

    let response = router
        .execute_request(&backend, &ProviderRequest::new(TaskCategory::Code, "hello"))
        .await
        .unwrap();

    assert_eq!(response.content, "anthropic:hello");
    assert_eq!(response.backend, "anthropic");
}

/// Test bearer auth for OpenAI and the attribution header for OpenRouter
#[tokio::test]
async fn test_bearer_auth_and_openrouter_headers() {
    let base = spawn_mock().await;
    let openai = descriptor("openai", BackendKind::OpenAi, format!("{base}/openai"), KEY);
    let openrouter = descriptor(
        "openrouter",
        BackendKind::OpenRouter,
        format!("{base}/openai"),
        KEY,
    );
    let router = router_for(vec![openai.clone(), openrouter.clone()]);
    let request = ProviderRequest::new(TaskCategory::Prose, "tagline");

    let plain = router.execute_request(&openai, &request).await.unwrap();
    assert_eq!(plain.content, "none:tagline");

    let routed = router.execute_request(&openrouter, &request).await.unwrap();
    assert_eq!(routed.content, "siteforge:tagline");
}

/// Test that Gemini puts the key in the query string
#[tokio::test]
async fn test_gemini_url_embedded_key() {
    let base = spawn_mock().await;
    let backend = descriptor("gemini", BackendKind::Gemini, format!("{base}/gemini"), KEY);
    let router = router_for(vec![backend.clone()]);

    let response = router
        .execute_request(&backend, &ProviderRequest::new(TaskCategory::Analysis, "x"))
        .await
        .unwrap();
    assert_eq!(response.content, "gemini:x");
}

/// Test that a wrong key surfaces as a backend-tagged RequestFailed
#[tokio::test]
async fn test_non_2xx_is_tagged_with_status_and_body() {
    let base = spawn_mock().await;
    let backend = descriptor(
        "anthropic",
        BackendKind::Anthropic,
        format!("{base}/anthropic"),
        "wrong",
    );
    let router = router_for(vec![backend.clone()]);

    let err = router
        .execute_request(&backend, &ProviderRequest::new(TaskCategory::Code, "x"))
        .await
        .unwrap_err();

    match err {
        ProviderError::RequestFailed {
            backend,
            status,
            body,
        } => {
            assert_eq!(backend, "anthropic");
            assert_eq!(status, 401);
            assert!(body.contains("bad key"));
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

/// Test that 429 is recognized as exhaustion
#[tokio::test]
async fn test_quota_response_indicates_exhaustion() {
    let base = spawn_mock().await;
    let backend = descriptor("openai", BackendKind::OpenAi, format!("{base}/quota"), KEY);
    let router = router_for(vec![backend.clone()]);

    let err = router
        .execute_request(&backend, &ProviderRequest::new(TaskCategory::Code, "x"))
        .await
        .unwrap_err();
    assert!(err.indicates_exhaustion());

    router.mark_exhausted(&err.backend().unwrap().to_string());
    assert!(router.candidates(TaskCategory::Code, None).await.is_err());
}

/// Test that a 2xx with a non-JSON body is InvalidResponse
#[tokio::test]
async fn test_unparseable_envelope() {
    let base = spawn_mock().await;
    let backend = descriptor("openai", BackendKind::OpenAi, format!("{base}/garbage"), KEY);
    let router = router_for(vec![backend.clone()]);

    let err = router
        .execute_request(&backend, &ProviderRequest::new(TaskCategory::Code, "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse { .. }));
}

/// Test that a closed port is a transport error, not a panic
#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = descriptor("openai", BackendKind::OpenAi, format!("http://{addr}/openai"), KEY);
    let router = router_for(vec![backend.clone()]);

    let err = router
        .execute_request(&backend, &ProviderRequest::new(TaskCategory::Code, "x"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Transport { .. } | ProviderError::Timeout { .. }
    ));
}
