//! Result types produced by the per-file pipeline and the batch runner.

use crate::error::PdfTitleError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The metadata fields this crate reads and writes.
///
/// Empty values are normalised to `None` when read, so absence and emptiness
/// are the same state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    /// Custom `Normalized` key; `"true"` once the file was renamed by this tool.
    pub normalized: Option<String>,
}

impl DocumentMetadata {
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    pub fn author(&self) -> Option<&str> {
        non_blank(self.author.as_deref())
    }

    /// Whether the `Normalized` marker was written by an earlier run.
    ///
    /// Informational only; the pipeline never branches on it.
    pub fn is_normalized(&self) -> bool {
        self.normalized.as_deref() == Some("true")
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

/// Keys of the document information dictionary touched by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataField {
    Title,
    Author,
    Subject,
    Keywords,
    CreationDate,
    ModDate,
    /// Non-standard key; downstream tools must know the convention.
    Normalized,
}

impl MetadataField {
    pub const ALL: [MetadataField; 7] = [
        MetadataField::Title,
        MetadataField::Author,
        MetadataField::Subject,
        MetadataField::Keywords,
        MetadataField::CreationDate,
        MetadataField::ModDate,
        MetadataField::Normalized,
    ];

    /// Dictionary key as stored in the PDF.
    pub fn key(self) -> &'static str {
        match self {
            MetadataField::Title => "Title",
            MetadataField::Author => "Author",
            MetadataField::Subject => "Subject",
            MetadataField::Keywords => "Keywords",
            MetadataField::CreationDate => "CreationDate",
            MetadataField::ModDate => "ModDate",
            MetadataField::Normalized => "Normalized",
        }
    }

    /// Store a read value into the matching slot of `meta`.
    pub(crate) fn assign(self, meta: &mut DocumentMetadata, value: Option<String>) {
        let slot = match self {
            MetadataField::Title => &mut meta.title,
            MetadataField::Author => &mut meta.author,
            MetadataField::Subject => &mut meta.subject,
            MetadataField::Keywords => &mut meta.keywords,
            MetadataField::CreationDate => &mut meta.creation_date,
            MetadataField::ModDate => &mut meta.modification_date,
            MetadataField::Normalized => &mut meta.normalized,
        };
        *slot = value.filter(|v| !v.is_empty());
    }
}

/// What happened to one file that was processed without error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOutcome {
    /// Title was already present; nothing was written.
    Inspected(DocumentMetadata),
    /// One or both fields were written (explicit override or auto-fill).
    MetadataUpdated {
        title: Option<String>,
        author: Option<String>,
    },
    /// The file name already matched `<Title>-<Author><ext>`.
    AlreadyNormalized,
    /// The file was marked normalised and moved.
    Renamed { from: PathBuf, to: PathBuf },
}

/// One input path and what became of it.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<FileOutcome, PdfTitleError>,
    /// Set when a failed file was moved into the quarantine directory.
    pub quarantined_to: Option<PathBuf>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Where the document lives after the batch step.
    pub fn final_path(&self) -> &Path {
        match (&self.result, &self.quarantined_to) {
            (_, Some(q)) => q,
            (Ok(FileOutcome::Renamed { to, .. }), None) => to,
            _ => &self.path,
        }
    }
}

/// Aggregate result of a batch, reports kept in input order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn quarantined(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.quarantined_to.is_some())
            .count()
    }
}
