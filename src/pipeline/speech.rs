//! Speech synthesis via a local espeak-ng subprocess.
//!
//! espeak-ng is invoked synchronously and blocks the current submission
//! until the WAV file is fully written. The text is handed over through a
//! temp file (`-f`) rather than argv — rewritten documents routinely exceed
//! the platform argument-length limit.
//!
//! espeak-ng must be installed on the host:
//! - Linux: `sudo apt-get install espeak-ng`
//! - macOS: `brew install espeak-ng`
//!
//! Failures are soft: the caller records the description and drops the
//! audio artifact without disturbing the text result.

use crate::config::ConversionConfig;
use std::io::Write;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Engine binary name; resolved through `PATH`.
const ENGINE: &str = "espeak-ng";

/// Synthesize `text` into a WAV file at `out_path`.
///
/// Returns a human-readable error description on failure.
pub async fn synthesize(
    text: &str,
    out_path: &Path,
    config: &ConversionConfig,
) -> Result<(), String> {
    let mut text_file =
        tempfile::NamedTempFile::new().map_err(|e| format!("temp file for speech text: {e}"))?;
    text_file
        .write_all(text.as_bytes())
        .map_err(|e| format!("writing speech text: {e}"))?;

    let output = Command::new(ENGINE)
        .arg("-v")
        .arg(&config.voice)
        .arg("-s")
        .arg(config.speech_wpm.to_string())
        .arg("-w")
        .arg(out_path)
        .arg("-f")
        .arg(text_file.path())
        .output()
        .await
        .map_err(|e| format!("failed to launch {ENGINE}: {e} (is espeak-ng installed?)"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "{ENGINE} exited with {}: {}",
            output.status,
            stderr.trim()
        ));
    }

    // espeak-ng can exit 0 without producing output for pathological input.
    if !out_path.exists() {
        return Err(format!("{ENGINE} produced no output file"));
    }

    debug!(path = %out_path.display(), "speech synthesis complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;

    fn engine_available() -> bool {
        std::process::Command::new(ENGINE)
            .arg("--version")
            .output()
            .is_ok()
    }

    #[tokio::test]
    async fn synthesize_writes_a_wav() {
        if !engine_available() {
            println!("SKIP — espeak-ng not installed");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("speech.wav");
        let config = ConversionConfig::builder().build().unwrap();

        synthesize("x squared is x squared", &out, &config)
            .await
            .expect("synthesis should succeed");

        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.len() > 44, "WAV should be larger than its header");
        assert_eq!(&bytes[..4], b"RIFF");
    }

    #[tokio::test]
    async fn unwritable_path_reports_error() {
        if !engine_available() {
            println!("SKIP — espeak-ng not installed");
            return;
        }

        let config = ConversionConfig::builder().build().unwrap();
        let err = synthesize("hello", Path::new("/no/such/dir/speech.wav"), &config)
            .await
            .unwrap_err();
        assert!(!err.is_empty());
    }
}
