//! Text-generation backend routing for siteforge
//!
//! A [`ProviderRouter`] holds a registry of backends (Anthropic, OpenAI,
//! OpenRouter, Gemini), picks one per task category from an ordered
//! preference list, and normalizes each backend's auth and response envelope
//! to a single `content` string. Cross-backend retry is deliberately left to
//! the caller, which walks [`ProviderGateway::candidates`].

mod anthropic_backend;
mod gemini_backend;
mod http_client;
mod openai_backend;
mod router;
mod types;

pub use router::{BackendStatus, ProviderRouter, default_preferences};
pub use siteforge_utils::error::ProviderError;
pub use types::{
    BackendDescriptor, BackendKind, ProviderGateway, ProviderRequest, ProviderResponse,
    default_system_prompt,
};
