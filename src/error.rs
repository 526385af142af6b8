//! Error types for the docx2plain library.
//!
//! The system has exactly two failure modes, and only one of them lives here:
//!
//! * [`ConvertError`] — **Fatal**: the conversion cannot proceed at all
//!   (unreadable input, malformed DOCX, missing API key, workspace I/O).
//!   Returned as `Err(ConvertError)` from the top-level `convert*` functions
//!   and terminates the request.
//!
//! * Remote-service failures are **not** errors at this level. The rewrite
//!   stage catches them and records a human-readable error string (with a
//!   token count of 0) inside [`crate::output::RewriteOutcome`], so the
//!   request still produces a page the user can read.
//!
//! A failed speech synthesis is softer still: it is reported as
//! [`crate::output::ConversionOutput::audio_error`] and the audio artifact
//! is simply absent.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docx2plain library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("DOCX file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a DOCX (ZIP) container.
    #[error("File is not a valid DOCX: '{path}'\nFirst bytes: {magic:?}")]
    NotADocx { path: PathBuf, magic: [u8; 4] },

    /// The DOCX container is corrupt and the parser rejected it.
    #[error("DOCX '{path}' could not be parsed: {detail}")]
    DocxParseFailed { path: PathBuf, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// No provider could be resolved (missing API key etc.).
    #[error("Rewrite provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The tokenizer for the configured model is unavailable.
    #[error("No tokenizer available for model '{model}': {detail}")]
    TokenizerUnavailable { model: String, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not clear or recreate a scratch directory.
    #[error("Failed to reset scratch directory '{path}': {source}")]
    WorkspaceResetFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_docx_display() {
        let e = ConvertError::NotADocx {
            path: PathBuf::from("notes.docx"),
            magic: *b"%PDF",
        };
        let msg = e.to_string();
        assert!(msg.contains("notes.docx"), "got: {msg}");
        assert!(msg.contains("not a valid DOCX"));
    }

    #[test]
    fn provider_not_configured_display() {
        let e = ConvertError::ProviderNotConfigured {
            provider: "openai".into(),
            hint: "Set OPENAI_API_KEY.".into(),
        };
        assert!(e.to_string().contains("openai"));
        assert!(e.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn tokenizer_unavailable_display() {
        let e = ConvertError::TokenizerUnavailable {
            model: "not-a-model".into(),
            detail: "unknown model".into(),
        };
        assert!(e.to_string().contains("not-a-model"));
    }

    #[test]
    fn workspace_reset_display_carries_path() {
        let e = ConvertError::WorkspaceResetFailed {
            path: PathBuf::from("uploads"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("uploads"));
    }
}
