//! Ordered fallback across text providers.

use indicators_core::{IndicatorError, TextProvider};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{Credentials, ENV_OLLAMA_API_KEY, ENV_OPENAI_API_KEY, ReportConfig};
use crate::ollama::{OllamaCloudProvider, OllamaLocalProvider};
use crate::openai::OpenAiProvider;

/// Text providers tried in order until one returns text.
///
/// Attempts are sequential and never retried. The first success wins and
/// later providers are not contacted; failures are logged and remembered so
/// the final diagnostic can name the last one.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn TextProvider>>,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl ProviderChain {
    /// Create a chain from an explicit provider list.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn TextProvider>>) -> Self {
        Self { providers }
    }

    /// Build the standard chain: local Ollama always, then Ollama Cloud and
    /// OpenAI when their keys are present.
    #[must_use]
    pub fn from_config(config: &ReportConfig, credentials: &Credentials) -> Self {
        let mut chain = Self::default();
        chain.register(Arc::new(OllamaLocalProvider::from_config(config)));
        if let Some(key) = &credentials.ollama_api_key {
            chain.register(Arc::new(OllamaCloudProvider::from_config(config, key)));
        }
        if let Some(key) = &credentials.openai_api_key {
            chain.register(Arc::new(OpenAiProvider::from_config(config, key)));
        }
        chain
    }

    /// Append a provider to the end of the chain.
    pub fn register(&mut self, provider: Arc<dyn TextProvider>) {
        debug!(provider = provider.name(), "Registering text provider");
        self.providers.push(provider);
    }

    /// Names of the providers in attempt order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Ask each provider in turn and return the first generated text.
    ///
    /// When every provider fails, returns a diagnostic naming the last
    /// error and the credentials that enable the cloud providers.
    pub async fn run(&self, prompt: &str) -> String {
        let mut last_error: Option<IndicatorError> = None;

        for provider in &self.providers {
            debug!(provider = provider.name(), "Requesting report");
            match provider.generate(prompt).await {
                Ok(text) => return text,
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        failure_message(last_error.as_ref())
    }
}

fn failure_message(last_error: Option<&IndicatorError>) -> String {
    let cause = last_error.map_or_else(|| "Ollama local: not running".to_string(), ToString::to_string);
    format!(
        "AI report failed. ({cause}. Set {ENV_OLLAMA_API_KEY} or {ENV_OPENAI_API_KEY} in .env for cloud.)"
    )
}
