//! Ollama text providers: a local daemon and the hosted cloud API.

use async_trait::async_trait;
use indicators_core::{Provider, Result, TextProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::ReportConfig;
use crate::http::{ChatMessage, ResponseMessage, post_json, require_text};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

/// Ollama running on this machine (`/api/generate`). Needs no credentials.
#[derive(Debug, Clone)]
pub struct OllamaLocalProvider {
    client: Client,
    url: String,
    model: String,
    timeout: Duration,
}

impl OllamaLocalProvider {
    /// Create a provider for `url` and `model`.
    #[must_use]
    pub fn new(url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            model: model.into(),
            timeout,
        }
    }

    /// Create a provider from the local settings in `config`.
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(&config.local_url, &config.local_model, config.timeout)
    }
}

impl Provider for OllamaLocalProvider {
    fn name(&self) -> &str {
        "Ollama local"
    }

    fn description(&self) -> &str {
        "Ollama daemon on localhost"
    }
}

#[async_trait]
impl TextProvider for OllamaLocalProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        let response: GenerateResponse =
            post_json(&self.client, self.name(), &self.url, None, &body, self.timeout).await?;
        require_text(self.name(), response.response, "response")
    }
}

/// Hosted Ollama chat API, authenticated with a bearer token.
#[derive(Clone)]
pub struct OllamaCloudProvider {
    client: Client,
    url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl fmt::Debug for OllamaCloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaCloudProvider")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OllamaCloudProvider {
    /// Create a provider for `url` and `model` using `api_key`.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            model: model.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    /// Create a provider from the cloud settings in `config`.
    #[must_use]
    pub fn from_config(config: &ReportConfig, api_key: impl Into<String>) -> Self {
        Self::new(&config.cloud_url, &config.cloud_model, api_key, config.timeout)
    }
}

impl Provider for OllamaCloudProvider {
    fn name(&self) -> &str {
        "Ollama Cloud"
    }

    fn description(&self) -> &str {
        "Hosted Ollama chat API"
    }
}

#[async_trait]
impl TextProvider for OllamaCloudProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage::user(prompt)],
            stream: false,
        };
        let response: ChatResponse = post_json(
            &self.client,
            self.name(),
            &self.url,
            Some(self.api_key.as_str()),
            &body,
            self.timeout,
        )
        .await?;
        require_text(
            self.name(),
            response.message.and_then(|m| m.content),
            "message.content",
        )
    }
}
