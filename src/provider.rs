//! Rewrite providers: the seam between the pipeline and the remote LLM.
//!
//! The pipeline talks to a [`RewriteProvider`] trait object rather than a
//! concrete HTTP client: tests inject a mock, callers inject middleware,
//! and the pipeline never learns which backend answered.
//!
//! [`OpenAiProvider`] is the one shipped implementation. It speaks both
//! endpoint styles ([`CompletionApi::Chat`] and [`CompletionApi::Legacy`])
//! against any OpenAI-compatible base URL. Deliberately no retry and no
//! backoff: a failed call is surfaced once, as an error the rewrite stage
//! converts to an inline message.

use crate::config::{CompletionApi, ConversionConfig};
use crate::error::ConvertError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failure of a single completion call.
///
/// These never escape the rewrite stage as `Err` — they are rendered into
/// the inline error string shown to the user.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced an HTTP response (DNS, TLS, timeout…).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response parsed but contained no completion text.
    #[error("empty response from model")]
    EmptyResponse,
}

/// A completion backend able to rewrite text.
#[async_trait]
pub trait RewriteProvider: Send + Sync {
    /// Send one blocking completion request and return the generated text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;

    /// Short provider name for logs and error messages.
    fn name(&self) -> &str;
}

/// OpenAI-compatible HTTP provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    api: CompletionApi,
    max_tokens: Option<usize>,
}

impl OpenAiProvider {
    /// Create a provider from explicit parts.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        api: CompletionApi,
        timeout: Duration,
        max_tokens: Option<usize>,
    ) -> Result<Self, ConvertError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConvertError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            api,
            max_tokens,
        })
    }

    async fn chat(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatRequestMessage { role: "system", content: system },
                ChatRequestMessage { role: "user", content: prompt },
            ],
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self.send(&url, &body).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }

    async fn legacy(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = CompletionRequest {
            model: &self.model,
            prompt,
            // The legacy endpoint defaults to 16 output tokens, which would
            // truncate every document. Always send an explicit budget.
            max_tokens: self.max_tokens.unwrap_or(2048),
        };

        let url = format!("{}/completions", self.base_url);
        let response = self.send(&url, &body).await?;

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.text.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }

    async fn send<T: Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Transport(format!("request timed out: {e}"))
                } else {
                    ProviderError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: truncate_body(&message),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl RewriteProvider for OpenAiProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        debug!(model = %self.model, api = ?self.api, "sending completion request");
        match self.api {
            CompletionApi::Chat => self.chat(system, prompt).await,
            CompletionApi::Legacy => self.legacy(prompt).await,
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Resolve the rewrite provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    the provider entirely; used as-is. This is how tests mock the remote
///    service.
/// 2. **Configured key** (`config.api_key`) — credential supplied through
///    the config layer (CLI flag, host secret store).
/// 3. **Environment** — `OPENAI_API_KEY`, the conventional variable.
///
/// Anything else is a fatal [`ConvertError::ProviderNotConfigured`].
pub fn resolve_provider(
    config: &ConversionConfig,
) -> Result<Arc<dyn RewriteProvider>, ConvertError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let api_key = match config.api_key.clone() {
        Some(key) if !key.is_empty() => key,
        _ => match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                return Err(ConvertError::ProviderNotConfigured {
                    provider: "openai".to_string(),
                    hint: "Set OPENAI_API_KEY or pass an API key via the configuration."
                        .to_string(),
                })
            }
        },
    };

    let provider = OpenAiProvider::new(
        config.base_url.clone(),
        api_key,
        config.model.clone(),
        config.api,
        Duration::from_secs(config.api_timeout_secs),
        config.max_tokens,
    )?;

    Ok(Arc::new(provider))
}

/// Keep HTTP error bodies readable in a single log line.
fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &body[..end])
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_injected_provider() {
        struct Fake;

        #[async_trait]
        impl RewriteProvider for Fake {
            async fn complete(&self, _: &str, _: &str) -> Result<String, ProviderError> {
                Ok("ok".to_string())
            }
            fn name(&self) -> &str {
                "fake"
            }
        }

        let config = ConversionConfig::builder()
            .provider(Arc::new(Fake))
            .build()
            .unwrap();
        let provider = resolve_provider(&config).expect("injected provider must resolve");
        assert_eq!(provider.name(), "fake");
    }

    #[test]
    fn resolve_uses_configured_key() {
        let config = ConversionConfig::builder()
            .api_key("sk-test")
            .build()
            .unwrap();
        let provider = resolve_provider(&config).expect("key in config must resolve");
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn chat_request_serialises_without_null_max_tokens() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatRequestMessage { role: "user", content: "hi" }],
            max_tokens: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("max_tokens"));
        assert!(json.contains("\"gpt-3.5-turbo\""));
    }

    #[test]
    fn chat_response_parses_first_choice() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":" hello "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, " hello ");
    }

    #[test]
    fn legacy_request_always_sends_max_tokens() {
        // The legacy endpoint defaults to 16 output tokens, so the request
        // must always carry an explicit budget.
        let body = CompletionRequest {
            model: "gpt-3.5-turbo-instruct",
            prompt: "hi",
            max_tokens: 2048,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"max_tokens\":2048"));
        assert!(json.contains("\"prompt\":\"hi\""));
    }

    #[test]
    fn legacy_response_parses_first_choice() {
        let json = r#"{"choices":[{"text":" plain text ","index":0}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].text, " plain text ");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(600);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with('…'));
        assert!(truncated.len() < long.len());
    }
}
