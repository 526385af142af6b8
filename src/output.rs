//! Result types returned by the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of the rewrite stage.
///
/// Never an `Err`: a remote-service failure is the one failure the system
/// catches and converts, so the outcome always carries displayable text.
/// On failure, `text` holds the human-readable error message and
/// `total_tokens` is 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteOutcome {
    /// Rewritten text on success; the inline error message on failure.
    pub text: String,
    /// Prompt tokens + response tokens, counted locally with the model's
    /// tokenizer. 0 when the call failed.
    pub total_tokens: usize,
    /// The underlying provider error, when the call failed.
    pub error: Option<String>,
}

impl RewriteOutcome {
    /// Whether the remote call succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything one conversion run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The text written to the output document (rewritten text, or the
    /// inline error message when the remote call failed).
    pub text: String,

    /// Total token usage reported to the user. 0 on rewrite failure.
    pub total_tokens: usize,

    /// Set when the remote rewrite call failed.
    pub rewrite_error: Option<String>,

    /// Path of the generated DOCX inside the output scratch directory.
    pub document_path: PathBuf,

    /// Path of the generated WAV, when speech synthesis ran and succeeded.
    pub audio_path: Option<PathBuf>,

    /// Set when speech synthesis was requested but failed. The text result
    /// is unaffected.
    pub audio_error: Option<String>,

    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_outcome_success_flag() {
        let ok = RewriteOutcome {
            text: "plain".into(),
            total_tokens: 12,
            error: None,
        };
        assert!(ok.is_success());

        let failed = RewriteOutcome {
            text: "Error: boom".into(),
            total_tokens: 0,
            error: Some("boom".into()),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.total_tokens, 0);
    }

    #[test]
    fn conversion_output_round_trips_through_json() {
        let out = ConversionOutput {
            text: "hello".into(),
            total_tokens: 3,
            rewrite_error: None,
            document_path: PathBuf::from("output/converted_text.docx"),
            audio_path: Some(PathBuf::from("output/speech.wav")),
            audio_error: None,
            duration_ms: 42,
        };
        let json = serde_json::to_string(&out).unwrap();
        let back: ConversionOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, "hello");
        assert_eq!(back.audio_path, out.audio_path);
    }
}
