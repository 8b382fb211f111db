//! Error types for the pdftitle library.
//!
//! Every failure is local to one file. [`PdfTitleError`] is returned from the
//! per-file pipeline; the batch runner never propagates it further but turns
//! it into a [`crate::output::FileReport`] and a quarantine move, so one bad
//! document cannot stop the rest of the batch.
//!
//! The variants follow the four failure families a caller cares about:
//!
//! * **Read/parse** — the document cannot be opened or its metadata
//!   dictionary cannot be dereferenced.
//! * **Missing metadata** — normalisation was requested without a Title and
//!   Author to build the name from.
//! * **Write** — a metadata save or a rename failed. Earlier steps are not
//!   rolled back.
//! * **Fatal fault** — a panic inside the per-file pipeline, caught at the
//!   batch boundary.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdftitle library.
#[derive(Debug, Error)]
pub enum PdfTitleError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The path exists but is a directory or other non-regular file.
    #[error("Not a regular file: '{path}'")]
    NotAFile { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF structure or its /Info dictionary cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Normalisation needs both Title and Author.
    #[error(
        "cannot normalize '{path}': missing Title or Author (Title='{}', Author='{}')",
        .title.as_deref().unwrap_or(""),
        .author.as_deref().unwrap_or("")
    )]
    MissingMetadata {
        path: PathBuf,
        title: Option<String>,
        author: Option<String>,
    },

    // ── Write errors ──────────────────────────────────────────────────────
    /// Setting a metadata key or saving the document failed.
    #[error("Failed to write metadata '{key}' to '{path}': {detail}")]
    MetadataWriteFailed {
        path: PathBuf,
        key: String,
        detail: String,
    },

    /// Moving the document to its normalised name failed.
    #[error("Failed to rename '{from}' to '{to}': {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Moving a failed document into the quarantine directory failed.
    #[error("Failed to move '{path}' to quarantine: {source}")]
    QuarantineFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Faults ────────────────────────────────────────────────────────────
    /// A panic escaped the per-file pipeline and was caught by the batch runner.
    #[error("PANIC: {0}")]
    Panicked(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PdfTitleError {
    /// True for failures that happened before anything was written.
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            PdfTitleError::FileNotFound { .. }
                | PdfTitleError::NotAFile { .. }
                | PdfTitleError::PermissionDenied { .. }
                | PdfTitleError::NotAPdf { .. }
                | PdfTitleError::CorruptPdf { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_metadata_display_shows_both_fields() {
        let e = PdfTitleError::MissingMetadata {
            path: PathBuf::from("a.pdf"),
            title: Some("Dune".into()),
            author: None,
        };
        let msg = e.to_string();
        assert!(msg.contains("Title='Dune'"), "got: {msg}");
        assert!(msg.contains("Author=''"), "got: {msg}");
    }

    #[test]
    fn rename_failed_keeps_source() {
        use std::error::Error as _;
        let e = PdfTitleError::RenameFailed {
            from: PathBuf::from("a.pdf"),
            to: PathBuf::from("b.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("b.pdf"));
    }

    #[test]
    fn panicked_display() {
        let e = PdfTitleError::Panicked("index out of bounds".into());
        assert_eq!(e.to_string(), "PANIC: index out of bounds");
    }

    #[test]
    fn read_failure_classification() {
        assert!(PdfTitleError::CorruptPdf {
            path: PathBuf::from("x.pdf"),
            detail: "bad xref".into(),
        }
        .is_read_failure());
        assert!(PdfTitleError::NotAFile {
            path: PathBuf::from("books"),
        }
        .is_read_failure());
        assert!(!PdfTitleError::Panicked("boom".into()).is_read_failure());
    }
}
