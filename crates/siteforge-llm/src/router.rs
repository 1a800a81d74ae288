//! Backend selection with ordered preferences, exhaustion tracking and a
//! rotation fallback.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use siteforge_config::Config;
use siteforge_utils::error::ProviderError;
use siteforge_utils::types::TaskCategory;

use crate::http_client::HttpClient;
use crate::types::{
    BackendDescriptor, BackendKind, ProviderGateway, ProviderRequest, ProviderResponse,
};
use crate::{anthropic_backend, gemini_backend, openai_backend};

/// Built-in preference order per category.
#[must_use]
pub fn default_preferences(category: TaskCategory) -> &'static [&'static str] {
    match category {
        TaskCategory::Code => &["anthropic", "openai", "openrouter", "gemini"],
        TaskCategory::Prose => &["openai", "anthropic", "gemini", "openrouter"],
        TaskCategory::Analysis => &["gemini", "anthropic", "openai", "openrouter"],
        TaskCategory::Vision => &["gemini", "openai", "anthropic"],
        TaskCategory::Chat => &["openai", "gemini", "anthropic", "openrouter"],
    }
}

/// Snapshot of one registered backend, for `siteforge providers`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BackendStatus {
    pub id: String,
    pub kind: BackendKind,
    pub model: String,
    pub configured: bool,
    pub exhausted: bool,
}

/// Registry of backends plus the routing policy over them.
pub struct ProviderRouter {
    /// Registration order; also the rotation order.
    backends: Vec<BackendDescriptor>,
    preferences: HashMap<TaskCategory, Vec<String>>,
    exhausted: Mutex<HashSet<String>>,
    rotation: AtomicUsize,
    client: HttpClient,
}

impl ProviderRouter {
    /// Build a router over explicit descriptors with the built-in preferences.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Misconfiguration` if the HTTP client cannot be built.
    pub fn new(
        backends: Vec<BackendDescriptor>,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let preferences = TaskCategory::iter()
            .map(|category| {
                let ids = default_preferences(category)
                    .iter()
                    .map(|id| (*id).to_string())
                    .collect();
                (category, ids)
            })
            .collect();

        Ok(Self {
            backends,
            preferences,
            exhausted: Mutex::new(HashSet::new()),
            rotation: AtomicUsize::new(0),
            client: HttpClient::new(request_timeout)?,
        })
    }

    /// Replace the preference list for one category.
    #[must_use]
    pub fn with_preferences(mut self, category: TaskCategory, ids: Vec<String>) -> Self {
        self.preferences.insert(category, ids);
        self
    }

    /// Build the router from configuration.
    ///
    /// Disabled providers are not registered. API keys are read from each
    /// provider's `api_key_env`; a missing key leaves the backend registered
    /// but unconfigured.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let mut backends = Vec::new();
        for (id, provider) in config.enabled_providers() {
            let kind = BackendKind::from_str(&provider.kind).map_err(|_| {
                ProviderError::Misconfiguration(format!(
                    "provider '{id}' has unknown kind '{}'",
                    provider.kind
                ))
            })?;
            backends.push(BackendDescriptor {
                id: id.clone(),
                kind,
                base_url: provider.base_url.clone(),
                model: provider.model.clone(),
                api_key: provider.api_key(),
                max_tokens: provider.max_tokens,
                temperature: provider.temperature,
            });
        }

        let mut router = Self::new(backends, config.llm.request_timeout())?;
        for category in TaskCategory::iter() {
            if let Some(ids) = config.routing_for(category) {
                router = router.with_preferences(category, ids.to_vec());
            }
        }

        info!(
            registered = router.backends.len(),
            configured = router.backends.iter().filter(|b| b.is_configured()).count(),
            "Provider router ready"
        );
        Ok(router)
    }

    fn backend(&self, id: &str) -> Option<&BackendDescriptor> {
        self.backends.iter().find(|b| b.id == id)
    }

    /// Configured and not exhausted.
    fn is_usable(&self, backend: &BackendDescriptor) -> bool {
        backend.is_configured() && !self.is_exhausted(&backend.id)
    }

    #[must_use]
    pub fn is_exhausted(&self, backend_id: &str) -> bool {
        self.exhausted
            .lock()
            .map(|set| set.contains(backend_id))
            .unwrap_or(false)
    }

    /// Forget every exhaustion mark.
    pub fn reset_exhaustion(&self) {
        if let Ok(mut set) = self.exhausted.lock() {
            set.clear();
        }
    }

    /// Pick one backend for a category.
    ///
    /// Order: usable override, then the first usable preference, then the next
    /// usable backend in rotation.
    pub fn select(
        &self,
        category: TaskCategory,
        override_id: Option<&str>,
    ) -> Result<BackendDescriptor, ProviderError> {
        if let Some(id) = override_id
            && let Some(backend) = self.backend(id)
            && self.is_usable(backend)
        {
            return Ok(backend.clone());
        }

        if let Some(ids) = self.preferences.get(&category) {
            for id in ids {
                if let Some(backend) = self.backend(id)
                    && self.is_usable(backend)
                {
                    debug!(category = %category, backend = %id, "Selected preferred backend");
                    return Ok(backend.clone());
                }
            }
        }

        self.rotation_order()
            .into_iter()
            .next()
            .inspect(|b| debug!(category = %category, backend = %b.id, "Selected backend by rotation"))
            .ok_or(ProviderError::NoProviderAvailable { category })
    }

    /// Usable backends starting at the rotation cursor, advancing the cursor.
    fn rotation_order(&self) -> Vec<BackendDescriptor> {
        let usable: Vec<&BackendDescriptor> =
            self.backends.iter().filter(|b| self.is_usable(b)).collect();
        if usable.is_empty() {
            return Vec::new();
        }
        let start = self.rotation.fetch_add(1, Ordering::Relaxed) % usable.len();
        usable
            .iter()
            .cycle()
            .skip(start)
            .take(usable.len())
            .map(|b| (*b).clone())
            .collect()
    }

    /// Full ordered fallback chain for a category, without duplicates.
    pub fn candidate_chain(
        &self,
        category: TaskCategory,
        override_id: Option<&str>,
    ) -> Result<Vec<BackendDescriptor>, ProviderError> {
        let mut chain: Vec<BackendDescriptor> = Vec::new();
        let push = |backend: &BackendDescriptor, chain: &mut Vec<BackendDescriptor>| {
            if self.is_usable(backend) && !chain.iter().any(|b| b.id == backend.id) {
                chain.push(backend.clone());
            }
        };

        if let Some(id) = override_id {
            match self.backend(id) {
                Some(backend) => push(backend, &mut chain),
                None => warn!(backend = %id, "Requested backend is not registered"),
            }
        }
        if let Some(ids) = self.preferences.get(&category) {
            for id in ids {
                if let Some(backend) = self.backend(id) {
                    push(backend, &mut chain);
                }
            }
        }
        for backend in self.rotation_order() {
            push(&backend, &mut chain);
        }

        if chain.is_empty() {
            return Err(ProviderError::NoProviderAvailable { category });
        }
        Ok(chain)
    }

    /// Send a request to one backend, normalizing auth and envelope by kind.
    pub async fn execute(
        &self,
        backend: &BackendDescriptor,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        match backend.kind {
            BackendKind::Anthropic => anthropic_backend::send(&self.client, backend, request).await,
            BackendKind::OpenAi | BackendKind::OpenRouter => {
                openai_backend::send(&self.client, backend, request).await
            }
            BackendKind::Gemini => gemini_backend::send(&self.client, backend, request).await,
        }
    }

    /// Status of every registered backend plus the selection per category.
    #[must_use]
    pub fn status(&self) -> Vec<BackendStatus> {
        self.backends
            .iter()
            .map(|b| BackendStatus {
                id: b.id.clone(),
                kind: b.kind,
                model: b.model.clone(),
                configured: b.is_configured(),
                exhausted: self.is_exhausted(&b.id),
            })
            .collect()
    }

    /// Which backend each category would pick right now, without advancing rotation.
    #[must_use]
    pub fn selection_table(&self) -> Vec<(TaskCategory, Option<String>)> {
        TaskCategory::iter()
            .map(|category| {
                let preferred = self.preferences.get(&category).and_then(|ids| {
                    ids.iter()
                        .filter_map(|id| self.backend(id))
                        .find(|b| self.is_usable(b))
                        .map(|b| b.id.clone())
                });
                let any = || {
                    self.backends
                        .iter()
                        .find(|b| self.is_usable(b))
                        .map(|b| b.id.clone())
                };
                (category, preferred.or_else(any))
            })
            .collect()
    }
}

#[async_trait]
impl ProviderGateway for ProviderRouter {
    async fn candidates(
        &self,
        category: TaskCategory,
        override_id: Option<&str>,
    ) -> Result<Vec<BackendDescriptor>, ProviderError> {
        self.candidate_chain(category, override_id)
    }

    async fn execute_request(
        &self,
        backend: &BackendDescriptor,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        self.execute(backend, request).await
    }

    fn mark_exhausted(&self, backend_id: &str) {
        if let Ok(mut set) = self.exhausted.lock()
            && set.insert(backend_id.to_string())
        {
            warn!(backend = %backend_id, "Backend marked exhausted");
        }
    }
}
