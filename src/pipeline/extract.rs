//! Text extraction: DOCX paragraphs to a single newline-joined string.
//!
//! A .docx file is a ZIP archive of XML parts; docx-rs parses it into a
//! typed tree. The path to actual words is
//! `Document → Paragraph → Run → Text`, and this module walks exactly that
//! path, nothing more. Tables, headers, and images carry no extractable
//! prose here — the rewrite prompt tells the model how to narrate what the
//! body text references.
//!
//! Empty paragraphs are kept: a document with N paragraphs yields exactly
//! N newline-joined segments, in original order, so blank lines survive the
//! round trip through [`crate::pipeline::write`].

use crate::error::ConvertError;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use std::path::Path;
use tracing::debug;

/// ZIP local-file-header magic; every OOXML container starts with it.
const DOCX_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Read a DOCX file and return its paragraph text, one paragraph per line.
///
/// # Errors
/// Fatal on a missing/unreadable file, a non-ZIP payload, or a container
/// the parser rejects. There is no partial extraction.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String, ConvertError> {
    let path = path.as_ref();

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => {
            return Err(ConvertError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
    };

    if bytes.len() < 4 || bytes[..4] != DOCX_MAGIC {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(ConvertError::NotADocx {
            path: path.to_path_buf(),
            magic,
        });
    }

    let text = extract_from_bytes(&bytes).map_err(|detail| ConvertError::DocxParseFailed {
        path: path.to_path_buf(),
        detail,
    })?;

    debug!(path = %path.display(), chars = text.len(), "extracted document text");
    Ok(text)
}

/// Parse DOCX bytes and join every paragraph's text with newlines.
pub fn extract_from_bytes(bytes: &[u8]) -> Result<String, String> {
    let docx = read_docx(bytes).map_err(|e| format!("{e:?}"))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(para) = child {
            paragraphs.push(paragraph_text(para));
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Concatenate the text runs of one paragraph.
///
/// Runs are parts of the same sentence (style boundaries), so they are
/// joined with no separator.
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut parts: Vec<String> = Vec::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    parts.push(t.text.clone());
                }
            }
        }
    }
    parts.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::write::write_document;

    #[test]
    fn extract_rejects_missing_file() {
        let err = extract_text("/definitely/not/here.docx").unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }));
    }

    #[test]
    fn extract_rejects_non_zip_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"%PDF-1.7 not a docx").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ConvertError::NotADocx { magic, .. } if &magic == b"%PDF"));
    }

    #[test]
    fn extract_rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.docx");
        std::fs::write(&path, b"PK").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(matches!(err, ConvertError::NotADocx { .. }));
    }

    #[test]
    fn paragraphs_come_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("three.docx");
        write_document("first\nsecond\nthird", &path).unwrap();

        let text = extract_text(&path).unwrap();
        assert_eq!(text, "first\nsecond\nthird");
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn empty_paragraphs_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.docx");
        write_document("above\n\nbelow", &path).unwrap();

        let text = extract_text(&path).unwrap();
        assert_eq!(text, "above\n\nbelow");
    }

    #[test]
    fn latex_passes_through_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.docx");
        write_document("$x^2$ is x squared.", &path).unwrap();

        assert_eq!(extract_text(&path).unwrap(), "$x^2$ is x squared.");
    }
}
