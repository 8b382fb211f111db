//! Metadata resolution: decide the effective Title/Author for a document.
//!
//! Deciding and persisting are separate steps. [`decide`] is a pure function
//! over already-read metadata; [`MetadataResolver::resolve`] gathers its
//! inputs from the store, and [`MetadataResolver::persist`] writes back only
//! the fields that were freshly derived.
//!
//! ## Fallback order (first match wins, per field)
//!
//! ```text
//! Title:  override ─▶ existing ─▶ page-1 text (opt-in) ─▶ filename ─▶ unset
//! Author: override ─▶ existing ─▶ default sentinel
//! ```
//!
//! Existing values are never overwritten by derived ones. When a document
//! already has a Title nothing is derived at all, not even a missing Author.

use crate::config::RunConfig;
use crate::error::PdfTitleError;
use crate::output::{DocumentMetadata, MetadataField};
use crate::store::DocumentStore;
use std::path::Path;
use tracing::{debug, warn};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Supplied explicitly by the caller.
    Override,
    /// Already present in the document.
    Existing,
    /// First non-blank line of page 1.
    Content,
    /// Derived from the file name.
    Filename,
    /// The configured default sentinel.
    Default,
}

/// One resolved field value and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub value: String,
    pub source: FieldSource,
}

impl ResolvedField {
    fn new(value: impl Into<String>, source: FieldSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    /// Whether this value must be written back to the document.
    pub fn needs_write(&self) -> bool {
        self.source != FieldSource::Existing
    }
}

/// The Title/Author pair chosen for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub title: Option<ResolvedField>,
    pub author: Option<ResolvedField>,
}

impl ResolvedIdentity {
    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().map(|f| f.value.as_str())
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_ref().map(|f| f.value.as_str())
    }

    /// Fields that were not already in the document, in write order.
    pub fn pending_writes(&self) -> Vec<(MetadataField, &str)> {
        [
            (MetadataField::Title, &self.title),
            (MetadataField::Author, &self.author),
        ]
        .into_iter()
        .filter_map(|(field, resolved)| {
            resolved
                .as_ref()
                .filter(|r| r.needs_write())
                .map(|r| (field, r.value.as_str()))
        })
        .collect()
    }

    pub fn needs_update(&self) -> bool {
        !self.pending_writes().is_empty()
    }
}

/// Identity made of the explicit overrides only, if any were given.
pub fn from_overrides(config: &RunConfig) -> Option<ResolvedIdentity> {
    if !config.has_overrides() {
        return None;
    }
    let field = |v: &Option<String>| {
        v.as_ref()
            .map(|s| ResolvedField::new(s.clone(), FieldSource::Override))
    };
    Some(ResolvedIdentity {
        title: field(&config.title_override),
        author: field(&config.author_override),
    })
}

/// Pure fallback decision for a document without overrides.
///
/// `content_title` is the page-1 suggestion, only consulted when the document
/// has no Title of its own.
pub fn decide(
    path: &Path,
    existing: &DocumentMetadata,
    content_title: Option<&str>,
    default_author: &str,
) -> ResolvedIdentity {
    let existing_author = existing
        .author()
        .map(|a| ResolvedField::new(a, FieldSource::Existing));

    if let Some(title) = existing.title() {
        return ResolvedIdentity {
            title: Some(ResolvedField::new(title, FieldSource::Existing)),
            author: existing_author,
        };
    }

    let title = content_title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| ResolvedField::new(t, FieldSource::Content))
        .or_else(|| {
            let guess = title_from_filename(path);
            if guess.trim().is_empty() {
                None
            } else {
                Some(ResolvedField::new(guess, FieldSource::Filename))
            }
        });

    ResolvedIdentity {
        title,
        author: existing_author
            .or_else(|| Some(ResolvedField::new(default_author, FieldSource::Default))),
    }
}

/// Strip the extension and turn `_` and `-` into spaces.
pub fn title_from_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.replace(['_', '-'], " ")
}

/// First non-blank line of extracted page text, trimmed.
pub fn first_meaningful_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Gathers resolver inputs from a [`DocumentStore`] and persists the result.
pub struct MetadataResolver<'a> {
    store: &'a dyn DocumentStore,
    config: &'a RunConfig,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(store: &'a dyn DocumentStore, config: &'a RunConfig) -> Self {
        Self { store, config }
    }

    /// Decide the identity for `path`, reading whatever the decision needs.
    ///
    /// Overrides short-circuit without reading the document at all.
    /// Also returns the metadata that was read, if any.
    pub fn resolve(
        &self,
        path: &Path,
    ) -> Result<(ResolvedIdentity, Option<DocumentMetadata>), PdfTitleError> {
        if let Some(identity) = from_overrides(self.config) {
            return Ok((identity, None));
        }

        let existing = self.store.read_metadata(path)?;
        let content_title = if existing.title().is_none() && self.config.title_from_content {
            self.suggest_from_content(path)
        } else {
            None
        };

        let identity = decide(
            path,
            &existing,
            content_title.as_deref(),
            &self.config.default_author,
        );
        debug!(
            "Resolved {}: title={:?} author={:?}",
            path.display(),
            identity.title,
            identity.author
        );
        Ok((identity, Some(existing)))
    }

    /// Write every freshly derived field. Returns the fields written.
    pub fn persist(
        &self,
        path: &Path,
        identity: &ResolvedIdentity,
    ) -> Result<Vec<MetadataField>, PdfTitleError> {
        let writes = identity.pending_writes();
        if writes.is_empty() {
            return Ok(Vec::new());
        }
        self.store.write_fields(path, &writes)?;
        Ok(writes.into_iter().map(|(f, _)| f).collect())
    }

    fn suggest_from_content(&self, path: &Path) -> Option<String> {
        match self.store.extract_first_page_text(path) {
            Ok(text) => text.as_deref().and_then(first_meaningful_line),
            Err(e) => {
                warn!(
                    "Could not read page text of {}, using the file name: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }
}
