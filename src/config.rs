//! Configuration types for DOCX-to-plain-English conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config between the web handlers, serialise it for
//! logging, and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ConvertError;
use crate::provider::RewriteProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use docx2plain::{CompletionApi, ConversionConfig, OutputMode};
///
/// let config = ConversionConfig::builder()
///     .model("gpt-3.5-turbo")
///     .api(CompletionApi::Chat)
///     .output_mode(OutputMode::DocumentAndSpeech)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// LLM model identifier, e.g. "gpt-3.5-turbo". Default: "gpt-3.5-turbo".
    ///
    /// Also selects the tokenizer used for usage reporting, so it must be a
    /// model the BPE registry knows about.
    pub model: String,

    /// Which completion endpoint style to call. Default: [`CompletionApi::Chat`].
    ///
    /// The two historical variants of this tool diverged on this axis; it is
    /// a config field rather than a separate program.
    pub api: CompletionApi,

    /// Whether to also synthesize speech audio. Default: [`OutputMode::Document`].
    pub output_mode: OutputMode,

    /// API credential. If None, `OPENAI_API_KEY` is read from the environment.
    pub api_key: Option<String>,

    /// Base URL of the completion service. Default: "https://api.openai.com/v1".
    ///
    /// Point this at any OpenAI-compatible endpoint (LiteLLM, vLLM, Ollama's
    /// compat layer) to use a different backend without code changes.
    pub base_url: String,

    /// Pre-constructed provider. Takes precedence over `api_key`/`base_url`.
    ///
    /// The injection seam for tests and for callers that need custom
    /// middleware around the remote call.
    pub provider: Option<Arc<dyn RewriteProvider>>,

    /// Per-request timeout for the completion call in seconds. Default: 120.
    ///
    /// Whole-document rewrites are slow for long inputs; 120 s covers the
    /// documents this tool is built for. There is deliberately no retry:
    /// a failed call becomes an inline error string, not a second attempt.
    pub api_timeout_secs: u64,

    /// Maximum tokens the model may generate. Default: None (provider default).
    pub max_tokens: Option<usize>,

    /// Custom system prompt. If None, uses the built-in assistant preamble.
    pub system_prompt: Option<String>,

    /// Root directory holding the `uploads/` and `output/` scratch
    /// directories. Default: current directory.
    pub workspace_root: PathBuf,

    /// espeak-ng voice identifier for speech synthesis. Default: "en".
    pub voice: String,

    /// espeak-ng speaking rate in words per minute. Default: 160.
    pub speech_wpm: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            api: CompletionApi::default(),
            output_mode: OutputMode::default(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            provider: None,
            api_timeout_secs: 120,
            max_tokens: None,
            system_prompt: None,
            workspace_root: PathBuf::from("."),
            voice: "en".to_string(),
            speech_wpm: 160,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("model", &self.model)
            .field("api", &self.api)
            .field("output_mode", &self.output_mode)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn RewriteProvider>"))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("workspace_root", &self.workspace_root)
            .field("voice", &self.voice)
            .field("speech_wpm", &self.speech_wpm)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api(mut self, api: CompletionApi) -> Self {
        self.config.api = api;
        self
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.config.output_mode = mode;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn provider(mut self, provider: Arc<dyn RewriteProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.workspace_root = root.into();
        self
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.config.voice = voice.into();
        self
    }

    pub fn speech_wpm(mut self, wpm: u32) -> Self {
        // espeak-ng accepts 80–450 wpm
        self.config.speech_wpm = wpm.clamp(80, 450);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(ConvertError::InvalidConfig("Model must not be empty".into()));
        }
        if c.base_url.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "Base URL must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which completion endpoint style the provider should call.
///
/// Two variants of the original tool existed: one against the chat
/// completions endpoint and one against the legacy text-completions
/// endpoint. Both survive as output modes of a single implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionApi {
    /// `POST {base}/chat/completions` with system + user messages. (default)
    #[default]
    Chat,
    /// `POST {base}/completions` with a bare prompt string.
    Legacy,
}

/// Which artifacts a conversion run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// Rewritten DOCX only. (default)
    #[default]
    Document,
    /// Rewritten DOCX plus a WAV narration of the rewritten text.
    DocumentAndSpeech,
}

impl OutputMode {
    /// Whether this mode includes speech synthesis.
    pub fn wants_speech(&self) -> bool {
        matches!(self, OutputMode::DocumentAndSpeech)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = ConversionConfig::builder().build().unwrap();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.api, CompletionApi::Chat);
        assert_eq!(config.output_mode, OutputMode::Document);
        assert!(!config.output_mode.wants_speech());
    }

    #[test]
    fn builder_rejects_empty_model() {
        let result = ConversionConfig::builder().model("  ").build();
        assert!(matches!(result, Err(ConvertError::InvalidConfig(_))));
    }

    #[test]
    fn speech_wpm_is_clamped() {
        let config = ConversionConfig::builder().speech_wpm(10_000).build().unwrap();
        assert_eq!(config.speech_wpm, 450);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ConversionConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
