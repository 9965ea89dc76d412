//! OpenAI chat-completions text provider.

use async_trait::async_trait;
use indicators_core::{Provider, Result, TextProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::ReportConfig;
use crate::http::{ChatMessage, ResponseMessage, post_json, require_text};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

/// OpenAI chat-completions API, authenticated with a bearer token.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiProvider {
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

    /// Create a provider from the OpenAI settings in `config`.
    #[must_use]
    pub fn from_config(config: &ReportConfig, api_key: impl Into<String>) -> Self {
        Self::new(&config.openai_url, &config.openai_model, api_key, config.timeout)
    }
}

impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn description(&self) -> &str {
        "OpenAI chat completions API"
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage::user(prompt)],
        };
        let response: ChatCompletionResponse = post_json(
            &self.client,
            self.name(),
            &self.url,
            Some(self.api_key.as_str()),
            &body,
            self.timeout,
        )
        .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content);
        require_text(self.name(), content, "choices[0].message.content")
    }
}
