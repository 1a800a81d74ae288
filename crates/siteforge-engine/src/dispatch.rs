//! Walking a backend candidate chain for one request.

use tracing::debug;

use siteforge_llm::{ProviderGateway, ProviderRequest, ProviderResponse};
use siteforge_utils::ProviderError;
use siteforge_utils::logging::log_backend_failure;

/// Send `request` to each candidate in order until one answers.
///
/// A 429/402 marks that backend exhausted for the rest of the process. Fails
/// with `NoProviderAvailable` when the chain is empty, otherwise with the last
/// backend's error.
pub async fn request_with_fallback(
    gateway: &dyn ProviderGateway,
    request: &ProviderRequest,
    override_id: Option<&str>,
) -> Result<ProviderResponse, ProviderError> {
    let candidates = gateway.candidates(request.category, override_id).await?;
    let mut last_error = ProviderError::NoProviderAvailable {
        category: request.category,
    };

    for backend in &candidates {
        debug!(backend = %backend.id, category = %request.category, "Dispatching request");
        match gateway.execute_request(backend, request).await {
            Ok(response) => return Ok(response),
            Err(err) => {
                if err.indicates_exhaustion() {
                    gateway.mark_exhausted(&backend.id);
                }
                log_backend_failure(&backend.id, &err.to_string());
                last_error = err;
            }
        }
    }

    Err(last_error)
}
