//! JSON-over-HTTP plumbing shared by the text providers.

use indicators_core::{IndicatorError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

/// A single user turn in a chat-style request.
#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub(crate) role: &'a str,
    pub(crate) content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub(crate) const fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// `message` object of a chat response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub(crate) content: Option<String>,
}

pub(crate) fn provider_error(provider: &str, message: impl Into<String>) -> IndicatorError {
    IndicatorError::Provider {
        provider: provider.to_string(),
        message: message.into(),
    }
}

/// POST `body` as JSON and decode the JSON answer.
///
/// Transport failures, non-2xx statuses and undecodable bodies all become
/// [`IndicatorError::Provider`] errors tagged with `provider`.
pub(crate) async fn post_json<B, R>(
    client: &Client,
    provider: &str,
    url: &str,
    bearer: Option<&str>,
    body: &B,
    timeout: Duration,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    debug!(provider, url, "Sending text generation request");

    let mut request = client.post(url).timeout(timeout).json(body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|e| provider_error(provider, e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(provider_error(provider, format!("HTTP {status}: {text}")));
    }

    let text = response
        .text()
        .await
        .map_err(|e| provider_error(provider, e.to_string()))?;

    serde_json::from_str(&text)
        .map_err(|e| provider_error(provider, format!("malformed response: {e}")))
}

/// Reject a missing or blank generated text.
pub(crate) fn require_text(provider: &str, text: Option<String>, field: &str) -> Result<String> {
    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| provider_error(provider, format!("response missing `{field}`")))
}
