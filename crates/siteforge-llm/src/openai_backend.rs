//! OpenAI-compatible chat completions adapter
//!
//! Serves both the `openai` and `openrouter` kinds. Auth is a bearer token;
//! OpenRouter additionally gets its attribution headers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_client::{HttpClient, parse_envelope};
use crate::types::{BackendDescriptor, BackendKind, ProviderRequest, ProviderResponse};
use siteforge_utils::error::ProviderError;

/// Default HTTP referer header value for OpenRouter
const OPENROUTER_REFERER: &str = "https://github.com/siteforge/siteforge";

/// Default X-Title header value for OpenRouter
const OPENROUTER_TITLE: &str = "siteforge";

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub(crate) fn build_request(backend: &BackendDescriptor, request: &ProviderRequest) -> ChatRequest {
    ChatRequest {
        model: backend.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: request.system_prompt().to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            },
        ],
        max_tokens: backend.max_tokens,
        temperature: backend.temperature,
        stream: false,
    }
}

pub(crate) fn parse_response(backend_id: &str, body: &str) -> Result<String, ProviderError> {
    let envelope: ChatResponse = parse_envelope(backend_id, body)?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse {
            backend: backend_id.to_string(),
            message: "response missing content in choices[0]".to_string(),
        })
}

pub(crate) async fn send(
    client: &HttpClient,
    backend: &BackendDescriptor,
    request: &ProviderRequest,
) -> Result<ProviderResponse, ProviderError> {
    let api_key = backend.api_key_or_err()?;
    let body = build_request(backend, request);

    debug!(
        backend = %backend.id,
        kind = %backend.kind,
        model = %backend.model,
        "Invoking chat completions backend"
    );

    let mut builder = client
        .inner()
        .post(&backend.base_url)
        .header("Authorization", format!("Bearer {api_key}"))
        .header("Content-Type", "application/json");

    if backend.kind == BackendKind::OpenRouter {
        builder = builder
            .header("HTTP-Referer", OPENROUTER_REFERER)
            .header("X-Title", OPENROUTER_TITLE);
    }

    let raw = client.send(builder.json(&body), &backend.id).await?;
    let content = parse_response(&backend.id, &raw)?;

    Ok(ProviderResponse {
        content,
        backend: backend.id.clone(),
        model: backend.model.clone(),
    })
}
