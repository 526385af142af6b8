//! Document writing: serialise rewritten text into a fresh DOCX.
//!
//! One paragraph per input line, so extraction of the written file yields
//! the original text unchanged — the inverse of
//! [`crate::pipeline::extract`].

use crate::error::ConvertError;
use docx_rs::{Docx, Paragraph, Run};
use std::path::Path;

/// Write `text` to a new DOCX at `path`, one paragraph per line.
pub fn write_document(text: &str, path: impl AsRef<Path>) -> Result<(), ConvertError> {
    let path = path.as_ref();

    let mut docx = Docx::new();
    for line in text.split('\n') {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }

    let file = std::fs::File::create(path).map_err(|e| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    docx.build().pack(file).map_err(|e| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: std::io::Error::other(format!("{e:?}")),
    })?;

    Ok(())
}
