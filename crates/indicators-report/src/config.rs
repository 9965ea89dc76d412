//! Endpoints, models and credentials for the text providers.

use std::fmt;
use std::time::Duration;

/// Environment variable enabling the Ollama Cloud provider.
pub const ENV_OLLAMA_API_KEY: &str = "OLLAMA_API_KEY";
/// Environment variable enabling the OpenAI provider.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Endpoint and model settings for every provider in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Local Ollama generate endpoint.
    pub local_url: String,
    /// Model requested from local Ollama.
    pub local_model: String,
    /// Ollama Cloud chat endpoint.
    pub cloud_url: String,
    /// Model requested from Ollama Cloud.
    pub cloud_model: String,
    /// OpenAI chat-completions endpoint.
    pub openai_url: String,
    /// Model requested from OpenAI.
    pub openai_model: String,
    /// Timeout applied to each provider attempt.
    pub timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            local_url: "http://localhost:11434/api/generate".to_string(),
            local_model: "gemma3:latest".to_string(),
            cloud_url: "https://ollama.com/api/chat".to_string(),
            cloud_model: "gpt-oss:20b-cloud".to_string(),
            openai_url: "https://api.openai.com/v1/chat/completions".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ReportConfig {
    /// Use a different local Ollama model.
    #[must_use]
    pub fn with_local_model(mut self, model: impl Into<String>) -> Self {
        self.local_model = model.into();
        self
    }
}

/// API keys gating the cloud providers. Empty values count as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token for Ollama Cloud.
    pub ollama_api_key: Option<String>,
    /// Bearer token for OpenAI.
    pub openai_api_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Credentials")
            .field("ollama_api_key", &redact(&self.ollama_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .finish()
    }
}

impl Credentials {
    /// Read both keys from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both keys through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v: &String| !v.trim().is_empty());
        Self {
            ollama_api_key: read(ENV_OLLAMA_API_KEY),
            openai_api_key: read(ENV_OPENAI_API_KEY),
        }
    }

    /// Set the Ollama Cloud key.
    #[must_use]
    pub fn with_ollama_api_key(mut self, key: impl Into<String>) -> Self {
        self.ollama_api_key = Some(key.into());
        self
    }

    /// Set the OpenAI key.
    #[must_use]
    pub fn with_openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }
}
