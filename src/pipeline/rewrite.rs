//! The rewrite stage: one completion call, failure caught and converted.
//!
//! This module assembles the prompt and drives the provider. It is
//! intentionally thin — the instruction template lives in
//! [`crate::prompts`] so it can change without touching error handling
//! here.
//!
//! ## Failure policy
//!
//! A transport or service failure is the single failure class the system
//! catches rather than propagates: the returned [`RewriteOutcome`] carries
//! a human-readable error string in place of rewritten text, with a token
//! count of 0. No retry, no backoff — one shot per submission.
//!
//! ## Token accounting
//!
//! Usage is counted locally (prompt tokens + response tokens under the
//! configured model's tokenizer) rather than read from the API response,
//! so both endpoint styles report the same way and the mock path in tests
//! behaves exactly like production.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::RewriteOutcome;
use crate::pipeline::tokens::count_tokens;
use crate::prompts::{build_rewrite_prompt, DEFAULT_SYSTEM_PROMPT};
use crate::provider::RewriteProvider;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Rewrite the extracted document text into plain spoken English.
///
/// Always returns `Ok(RewriteOutcome)` for remote failures; only a broken
/// tokenizer configuration is fatal.
pub async fn rewrite_text(
    provider: &Arc<dyn RewriteProvider>,
    text: &str,
    config: &ConversionConfig,
) -> Result<RewriteOutcome, ConvertError> {
    let start = Instant::now();
    let system = config
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT);
    let prompt = build_rewrite_prompt(text);

    match provider.complete(system, &prompt).await {
        Ok(rewritten) => {
            let prompt_tokens = count_tokens(&prompt, &config.model)?;
            let response_tokens = count_tokens(&rewritten, &config.model)?;
            debug!(
                provider = provider.name(),
                prompt_tokens,
                response_tokens,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "rewrite complete"
            );
            Ok(RewriteOutcome {
                text: rewritten,
                total_tokens: prompt_tokens + response_tokens,
                error: None,
            })
        }
        Err(e) => {
            let message = e.to_string();
            warn!(provider = provider.name(), error = %message, "rewrite failed");
            Ok(RewriteOutcome {
                text: format!("Error: {message}"),
                total_tokens: 0,
                error: Some(message),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use async_trait::async_trait;

    struct CannedProvider {
        reply: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl RewriteProvider for CannedProvider {
        async fn complete(&self, _: &str, _: &str) -> Result<String, ProviderError> {
            match self.reply {
                Ok(s) => Ok(s.to_string()),
                Err(msg) => Err(ProviderError::Transport(msg.to_string())),
            }
        }
        fn name(&self) -> &str {
            "canned"
        }
    }

    fn config() -> ConversionConfig {
        ConversionConfig::builder().build().unwrap()
    }

    #[tokio::test]
    async fn success_counts_prompt_plus_response() {
        let provider: Arc<dyn RewriteProvider> = Arc::new(CannedProvider {
            reply: Ok("x squared is x squared."),
        });

        let outcome = rewrite_text(&provider, "$x^2$ is x squared.", &config())
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.text, "x squared is x squared.");
        // Prompt alone is hundreds of tokens; the sum must exceed the
        // response's share.
        assert!(outcome.total_tokens > 100, "got {}", outcome.total_tokens);
    }

    #[tokio::test]
    async fn failure_becomes_inline_error_with_zero_tokens() {
        let provider: Arc<dyn RewriteProvider> = Arc::new(CannedProvider {
            reply: Err("connection refused"),
        });

        let outcome = rewrite_text(&provider, "anything", &config()).await.unwrap();

        assert!(!outcome.is_success());
        assert!(!outcome.text.is_empty());
        assert!(outcome.text.starts_with("Error:"));
        assert!(outcome.text.contains("connection refused"));
        assert_eq!(outcome.total_tokens, 0);
    }
}
