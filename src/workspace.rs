//! Scratch-directory management for per-request intermediate files.
//!
//! Every conversion run starts from a blank slate: [`Workspace::reset`]
//! deletes and recreates both the upload and output directories, so no file
//! from a previous run can leak into the next one. The directories are
//! shared mutable state with no locking — the surrounding host is expected
//! to serialise submissions, and this module does not enforce that.

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Names of the two scratch directories under the workspace root.
const UPLOADS_DIR: &str = "uploads";
const OUTPUT_DIR: &str = "output";

/// The pair of scratch directories used by one conversion run.
#[derive(Debug, Clone)]
pub struct Workspace {
    uploads: PathBuf,
    output: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at `root`. Does not touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            uploads: root.join(UPLOADS_DIR),
            output: root.join(OUTPUT_DIR),
        }
    }

    /// Directory holding the persisted upload for the current run.
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads
    }

    /// Directory holding the generated artifacts for the current run.
    pub fn output_dir(&self) -> &Path {
        &self.output
    }

    /// Delete and recreate both scratch directories.
    ///
    /// After this returns, both directories exist and are empty regardless
    /// of their prior contents.
    pub fn reset(&self) -> Result<(), ConvertError> {
        for dir in [&self.uploads, &self.output] {
            clear_directory(dir)?;
        }
        debug!(uploads = %self.uploads.display(), output = %self.output.display(), "workspace reset");
        Ok(())
    }

    /// Persist uploaded bytes under the uploads directory.
    ///
    /// The filename is reduced to its final component so a crafted
    /// `../../name` cannot escape the scratch directory.
    pub fn persist_upload(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ConvertError> {
        let safe_name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("upload.docx");

        let path = self.uploads.join(safe_name);
        std::fs::write(&path, bytes).map_err(|e| ConvertError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

/// Remove a directory tree (if present) and recreate it empty.
fn clear_directory(dir: &Path) -> Result<(), ConvertError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| ConvertError::WorkspaceResetFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::create_dir_all(dir).map_err(|e| ConvertError::WorkspaceResetFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}
