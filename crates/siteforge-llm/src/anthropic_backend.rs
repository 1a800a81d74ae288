//! Anthropic Messages API adapter
//!
//! Auth goes in a custom `x-api-key` header; the answer is the concatenation of
//! every `text` content block.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_client::{HttpClient, parse_envelope};
use crate::types::{BackendDescriptor, ProviderRequest, ProviderResponse};
use siteforge_utils::error::ProviderError;

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

pub(crate) fn build_request(
    backend: &BackendDescriptor,
    request: &ProviderRequest,
) -> AnthropicRequest {
    AnthropicRequest {
        model: backend.model.clone(),
        messages: vec![AnthropicMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        }],
        max_tokens: backend.max_tokens,
        temperature: backend.temperature,
        system: Some(request.system_prompt().to_string()),
    }
}

pub(crate) fn parse_response(backend_id: &str, body: &str) -> Result<String, ProviderError> {
    let envelope: AnthropicResponse = parse_envelope(backend_id, body)?;

    let content: String = envelope
        .content
        .iter()
        .filter(|block| block.content_type == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();

    if content.is_empty() {
        return Err(ProviderError::InvalidResponse {
            backend: backend_id.to_string(),
            message: "response missing text content".to_string(),
        });
    }
    Ok(content)
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
        model = %backend.model,
        max_tokens = backend.max_tokens,
        "Invoking Anthropic backend"
    );

    let builder = client
        .inner()
        .post(&backend.base_url)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("content-type", "application/json")
        .json(&body);

    let raw = client.send(builder, &backend.id).await?;
    let content = parse_response(&backend.id, &raw)?;

    Ok(ProviderResponse {
        content,
        backend: backend.id.clone(),
        model: backend.model.clone(),
    })
}
