//! Shared HTTP client infrastructure for backend requests
//!
//! One `reqwest::Client` per router, configured once with connect and pool
//! settings. Requests are sent exactly once; cross-backend fallback is the
//! caller's job.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use siteforge_utils::error::ProviderError;
use siteforge_utils::redaction::{redact_body_for_log, redact_error_message};

/// Default connect timeout (30 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept on a `RequestFailed`
const MAX_ERROR_BODY_CHARS: usize = 2000;

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Arc<Client>,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client whose requests are capped at `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Misconfiguration` if the client cannot be constructed
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                ProviderError::Misconfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client: Arc::new(client),
            timeout,
        })
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Send a request and return the body of a 2xx response.
    ///
    /// Non-2xx responses become `RequestFailed` carrying the (redacted, capped) body.
    pub async fn send(
        &self,
        request_builder: reqwest::RequestBuilder,
        backend: &str,
    ) -> Result<String, ProviderError> {
        debug!(
            backend = backend,
            timeout_secs = self.timeout.as_secs(),
            "Executing HTTP request"
        );

        let response = request_builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e, backend))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProviderError::Transport {
            backend: backend.to_string(),
            message: redact_error_message(&e.to_string()),
        })?;

        if !status.is_success() {
            return Err(ProviderError::RequestFailed {
                backend: backend.to_string(),
                status: status.as_u16(),
                body: redact_body_for_log(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        Ok(body)
    }

    fn map_send_error(&self, e: &reqwest::Error, backend: &str) -> ProviderError {
        if e.is_timeout() {
            return ProviderError::Timeout {
                backend: backend.to_string(),
                duration: self.timeout,
            };
        }
        ProviderError::Transport {
            backend: backend.to_string(),
            message: redact_error_message(&e.to_string()),
        }
    }
}

/// Parse a JSON envelope, tagging failures with the backend id.
pub(crate) fn parse_envelope<T: serde::de::DeserializeOwned>(
    backend: &str,
    body: &str,
) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::InvalidResponse {
        backend: backend.to_string(),
        message: format!("failed to parse response: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpClient::new(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_parse_envelope_tags_backend() {
        let err = parse_envelope::<serde_json::Value>("gemini", "<html>").unwrap_err();
        assert_eq!(err.backend(), Some("gemini"));
        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    }
}
