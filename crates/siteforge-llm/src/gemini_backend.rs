//! Gemini generateContent adapter
//!
//! The API key travels in the `?key=` query parameter. Error text is redacted
//! before it leaves the HTTP layer so the URL never leaks into logs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http_client::{HttpClient, parse_envelope};
use crate::types::{BackendDescriptor, ProviderRequest, ProviderResponse};
use siteforge_utils::error::ProviderError;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// `{base}/models/{model}:generateContent?key={key}`
pub(crate) fn endpoint(backend: &BackendDescriptor, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        backend.base_url.trim_end_matches('/'),
        backend.model,
        api_key
    )
}

pub(crate) fn build_request(backend: &BackendDescriptor, request: &ProviderRequest) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: request.prompt.clone(),
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: request.system_prompt().to_string(),
            }],
        },
        generation_config: GenerationConfig {
            max_output_tokens: backend.max_tokens,
            temperature: backend.temperature,
        },
    }
}

pub(crate) fn parse_response(backend_id: &str, body: &str) -> Result<String, ProviderError> {
    let envelope: GeminiResponse = parse_envelope(backend_id, body)?;

    let content: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(ProviderError::InvalidResponse {
            backend: backend_id.to_string(),
            message: "response missing candidates[0] text".to_string(),
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

    debug!(backend = %backend.id, model = %backend.model, "Invoking Gemini backend");

    let builder = client
        .inner()
        .post(endpoint(backend, api_key))
        .header("Content-Type", "application/json")
        .json(&body);

    let raw = client.send(builder, &backend.id).await?;
    let content = parse_response(&backend.id, &raw)?;

    Ok(ProviderResponse {
        content,
        backend: backend.id.clone(),
        model: backend.model.clone(),
    })
}
