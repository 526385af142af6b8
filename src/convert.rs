//! Conversion entry points: one linear run per submitted document.
//!
//! There is deliberately no state machine and no concurrency here. Each
//! call is a fresh pass over the pipeline stages in order — extract,
//! rewrite, clean, write, optionally speak — with every external call
//! blocking the current submission until it finishes.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::output::ConversionOutput;
use crate::pipeline::{extract, postprocess, rewrite, speech, write};
use crate::provider::resolve_provider;
use crate::workspace::Workspace;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Name of the DOCX artifact inside the output scratch directory.
pub const OUTPUT_DOCUMENT: &str = "converted_text.docx";
/// Name of the WAV artifact inside the output scratch directory.
pub const OUTPUT_AUDIO: &str = "speech.wav";

/// Convert a DOCX file into plain spoken English.
///
/// Artifacts land in the `output/` directory under
/// [`ConversionConfig::workspace_root`]; the caller is expected to have
/// reset the workspace beforehand (the web layer does this on every
/// submission).
///
/// # Errors
/// Returns `Err(ConvertError)` only for fatal errors — unreadable or
/// malformed input, missing provider configuration, artifact write
/// failures. A failed remote rewrite still returns `Ok`, with the inline
/// error message in `output.text` and `rewrite_error` set.
pub async fn convert(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let start = Instant::now();
    let input = input.as_ref().to_path_buf();
    info!(input = %input.display(), "starting conversion");

    // ── Step 1: Extract paragraph text ───────────────────────────────────
    // docx parsing is synchronous CPU work; keep it off the async hot path.
    let text = tokio::task::spawn_blocking(move || extract::extract_text(&input))
        .await
        .map_err(|e| ConvertError::Internal(format!("extraction task: {e}")))??;

    // ── Step 2: Resolve the provider ─────────────────────────────────────
    let provider = resolve_provider(config)?;

    // ── Step 3: Rewrite via the LLM ──────────────────────────────────────
    let mut outcome = rewrite::rewrite_text(&provider, &text, config).await?;
    if outcome.is_success() {
        outcome.text = postprocess::clean_text(&outcome.text);
    }

    // ── Step 4: Write the output document ────────────────────────────────
    let workspace = Workspace::new(&config.workspace_root);
    std::fs::create_dir_all(workspace.output_dir()).map_err(|e| {
        ConvertError::OutputWriteFailed {
            path: workspace.output_dir().to_path_buf(),
            source: e,
        }
    })?;
    let document_path = workspace.output_dir().join(OUTPUT_DOCUMENT);
    write::write_document(&outcome.text, &document_path)?;

    // ── Step 5: Speech synthesis (mode-dependent) ────────────────────────
    let mut audio_path = None;
    let mut audio_error = None;
    if config.output_mode.wants_speech() && outcome.is_success() {
        let wav_path = workspace.output_dir().join(OUTPUT_AUDIO);
        match speech::synthesize(&outcome.text, &wav_path, config).await {
            Ok(()) => audio_path = Some(wav_path),
            Err(detail) => {
                warn!(error = %detail, "speech synthesis failed");
                audio_error = Some(detail);
            }
        }
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        tokens = outcome.total_tokens,
        failed = !outcome.is_success(),
        duration_ms,
        "conversion finished"
    );

    Ok(ConversionOutput {
        text: outcome.text,
        total_tokens: outcome.total_tokens,
        rewrite_error: outcome.error,
        document_path,
        audio_path,
        audio_error,
        duration_ms,
    })
}

/// Convert uploaded DOCX bytes, persisting them to the uploads scratch
/// directory first.
///
/// This is the web handler's path: reset the workspace, persist the
/// upload under its (sanitised) original filename, then run [`convert`].
pub async fn convert_upload(
    filename: &str,
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let workspace = Workspace::new(&config.workspace_root);
    workspace.reset()?;
    let upload_path = workspace.persist_upload(filename, bytes)?;
    convert(upload_path, config).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input, config))
}
