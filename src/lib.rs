//! # docx2plain
//!
//! Convert DOCX documents containing LaTeX and programming code into plain
//! spoken English, using an LLM completion endpoint for the rewrite and an
//! optional local speech engine for narration.
//!
//! ## Why this crate?
//!
//! Screen readers stumble over raw LaTeX (`$ax^2+bx+c=0$`) and code blocks.
//! This crate extracts a document's text, asks a language model to rewrite
//! the mathematical and programmatic passages the way a human would read
//! them aloud, and hands back a fresh DOCX — optionally with a WAV
//! narration synthesized by espeak-ng.
//!
//! ## Pipeline Overview
//!
//! ```text
//! DOCX
//!  │
//!  ├─ 1. Extract   paragraph text via docx-rs, one paragraph per line
//!  ├─ 2. Rewrite   one completion call (chat or legacy endpoint)
//!  ├─ 3. Clean     deterministic cleanup of the model reply
//!  ├─ 4. Write     rewritten text into a new DOCX
//!  └─ 5. Speak     optional WAV via local espeak-ng
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docx2plain::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from OPENAI_API_KEY
//!     let config = ConversionConfig::default();
//!     let output = convert("lecture_notes.docx", &config).await?;
//!     println!("{}", output.text);
//!     eprintln!("tokens used: {}", output.total_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `web`   | on      | Enables the `docx2plain` server binary and the [`web`] module (axum + clap + tracing-subscriber) |
//!
//! Disable `web` when using only the library:
//! ```toml
//! docx2plain = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Extraction and I/O failures are fatal ([`ConvertError`]). A failed
//! remote rewrite is not: the run still completes, with the error message
//! inline in the output text and a token count of 0. A failed speech
//! synthesis only costs the audio artifact.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod provider;
#[cfg(feature = "web")]
pub mod web;
pub mod workspace;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CompletionApi, ConversionConfig, ConversionConfigBuilder, OutputMode};
pub use convert::{convert, convert_sync, convert_upload, OUTPUT_AUDIO, OUTPUT_DOCUMENT};
pub use error::ConvertError;
pub use output::{ConversionOutput, RewriteOutcome};
pub use provider::{OpenAiProvider, ProviderError, RewriteProvider};
pub use workspace::Workspace;
