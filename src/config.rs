//! Configuration for a batch run.
//!
//! Every per-file decision reads from one [`RunConfig`] passed in explicitly,
//! so two batches with different overrides can run in the same process
//! without any shared state.

use crate::error::PdfTitleError;
use crate::progress::ProgressCallback;
use crate::store::DocumentStore;
use std::fmt;
use std::path::{Component, Path};
use std::sync::Arc;

/// Author written when a document has none and one has to be filled in.
pub const DEFAULT_AUTHOR: &str = "NIF";

/// Name of the quarantine directory created beside failing files.
pub const DEFAULT_QUARANTINE_DIR: &str = "error";

/// Configuration for processing a batch of documents.
///
/// Built via [`RunConfig::builder()`] or using [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use pdftitle::RunConfig;
///
/// let config = RunConfig::builder()
///     .normalize(true)
///     .default_author("Unknown")
///     .build()
///     .unwrap();
/// assert!(config.normalize);
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Explicit Title to write. Takes precedence over every other mode.
    pub title_override: Option<String>,

    /// Explicit Author to write. Takes precedence over every other mode.
    pub author_override: Option<String>,

    /// Rename files to `<Title>-<Author><ext>` instead of auto-filling.
    pub normalize: bool,

    /// Try the first line of page 1 before the filename when a Title is missing.
    /// Default: false.
    pub title_from_content: bool,

    /// Author used when auto-filling a document that has none. Default: `"NIF"`.
    pub default_author: String,

    /// Sibling directory failing files are moved into. Default: `"error"`.
    pub quarantine_dir_name: String,

    /// Receives per-file events. None means no events.
    pub progress_callback: Option<ProgressCallback>,

    /// Pre-constructed document backend. None means [`crate::store::LopdfStore`].
    pub store: Option<Arc<dyn DocumentStore>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            title_override: None,
            author_override: None,
            normalize: false,
            title_from_content: false,
            default_author: DEFAULT_AUTHOR.to_string(),
            quarantine_dir_name: DEFAULT_QUARANTINE_DIR.to_string(),
            progress_callback: None,
            store: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("title_override", &self.title_override)
            .field("author_override", &self.author_override)
            .field("normalize", &self.normalize)
            .field("title_from_content", &self.title_from_content)
            .field("default_author", &self.default_author)
            .field("quarantine_dir_name", &self.quarantine_dir_name)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .field("store", &self.store.as_ref().map(|_| "<dyn DocumentStore>"))
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }

    /// True when either explicit override is set.
    pub fn has_overrides(&self) -> bool {
        self.title_override.is_some() || self.author_override.is_some()
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Empty strings are treated as "not set".
    pub fn title_override(mut self, title: impl Into<String>) -> Self {
        self.config.title_override = non_empty(title.into());
        self
    }

    /// Empty strings are treated as "not set".
    pub fn author_override(mut self, author: impl Into<String>) -> Self {
        self.config.author_override = non_empty(author.into());
        self
    }

    pub fn normalize(mut self, v: bool) -> Self {
        self.config.normalize = v;
        self
    }

    pub fn title_from_content(mut self, v: bool) -> Self {
        self.config.title_from_content = v;
        self
    }

    pub fn default_author(mut self, author: impl Into<String>) -> Self {
        self.config.default_author = author.into();
        self
    }

    pub fn quarantine_dir_name(mut self, name: impl Into<String>) -> Self {
        self.config.quarantine_dir_name = name.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.config.store = Some(store);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, PdfTitleError> {
        let c = &self.config;
        if c.default_author.trim().is_empty() {
            return Err(PdfTitleError::InvalidConfig(
                "Default author must not be blank".into(),
            ));
        }
        if !is_single_component(&c.quarantine_dir_name) {
            return Err(PdfTitleError::InvalidConfig(format!(
                "Quarantine directory must be a plain directory name, got '{}'",
                c.quarantine_dir_name
            )));
        }
        Ok(self.config)
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
