//! Batch entry points: process many documents, quarantining failures.
//!
//! Files are handled one at a time in input order. Each file runs inside a
//! supervised boundary: an `Err` from the pipeline and a panic caught with
//! [`std::panic::catch_unwind`] both end up on the same path, a report plus a
//! move into the sibling quarantine directory. One bad file never stops the
//! rest of the batch.

use crate::config::RunConfig;
use crate::error::PdfTitleError;
use crate::output::{BatchSummary, FileOutcome, FileReport, MetadataField};
use crate::pipeline::resolve::{from_overrides, MetadataResolver, ResolvedIdentity};
use crate::pipeline::{input, normalize, unique};
use crate::progress::{BatchProgressCallback, NoopProgressCallback};
use crate::store::{DocumentStore, LopdfStore};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Process every path in order and return one report per path.
///
/// Never fails as a whole; per-file errors are in the reports.
///
/// # Example
/// ```rust,no_run
/// use pdftitle::{run_batch, RunConfig};
///
/// let config = RunConfig::builder().normalize(true).build().unwrap();
/// let summary = run_batch(&["a.pdf", "b.pdf"], &config);
/// eprintln!("{}/{} ok", summary.succeeded(), summary.total());
/// ```
pub fn run_batch(paths: &[impl AsRef<Path>], config: &RunConfig) -> BatchSummary {
    let store = resolve_store(config);
    let noop = NoopProgressCallback;
    let progress: &dyn BatchProgressCallback = match config.progress_callback {
        Some(ref cb) => cb.as_ref(),
        None => &noop,
    };

    let total = paths.len();
    info!("Starting batch of {} files", total);
    progress.on_batch_start(total);

    let mut summary = BatchSummary::default();
    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        progress.on_file_start(index, total, path);

        let result = supervised(|| process_file_with(store.as_ref(), path, config));

        let quarantined_to = match &result {
            Ok(outcome) => {
                progress.on_file_complete(index, total, path, outcome);
                None
            }
            Err(e) => {
                if e.is_read_failure() {
                    warn!("Cannot read '{}': {}", path.display(), e);
                } else {
                    error!("Error processing '{}': {}", path.display(), e);
                }
                progress.on_file_error(index, total, path, e);
                match quarantine(path, &config.quarantine_dir_name) {
                    Ok(dest) => {
                        progress.on_quarantined(path, &dest);
                        Some(dest)
                    }
                    Err(qe) => {
                        error!("{}", qe);
                        progress.on_quarantine_failed(path, &qe);
                        None
                    }
                }
            }
        };

        summary.reports.push(FileReport {
            path: path.to_path_buf(),
            result,
            quarantined_to,
        });
    }

    info!(
        "Batch complete: {}/{} succeeded, {} quarantined",
        summary.succeeded(),
        summary.total(),
        summary.quarantined()
    );
    progress.on_batch_complete(&summary);
    summary
}

/// Process one document with the configured (or default) store.
pub fn process_file(path: &Path, config: &RunConfig) -> Result<FileOutcome, PdfTitleError> {
    let store = resolve_store(config);
    process_file_with(store.as_ref(), path, config)
}

/// Run the per-file pipeline for the mode selected in `config`.
///
/// 1. Overrides set: write them and stop.
/// 2. `normalize`: rename after the document's metadata.
/// 3. Otherwise: report existing metadata, or auto-fill a missing Title.
pub fn process_file_with(
    store: &dyn DocumentStore,
    path: &Path,
    config: &RunConfig,
) -> Result<FileOutcome, PdfTitleError> {
    let path = input::resolve_input(path)?;
    let resolver = MetadataResolver::new(store, config);

    if let Some(identity) = from_overrides(config) {
        let written = resolver.persist(&path, &identity)?;
        return Ok(updated(&identity, &written));
    }

    if config.normalize {
        return normalize::normalize(store, &path);
    }

    let (identity, existing) = resolver.resolve(&path)?;
    if !identity.needs_update() {
        return Ok(FileOutcome::Inspected(existing.unwrap_or_default()));
    }

    info!("No metadata title found in {}", path.display());
    let written = resolver.persist(&path, &identity)?;
    Ok(updated(&identity, &written))
}

/// Move a failed document into `<its dir>/<dir_name>/`, never overwriting.
///
/// Only regular files are moved; a directory or a missing path is left where
/// it is and reported as [`PdfTitleError::QuarantineFailed`].
pub fn quarantine(path: &Path, dir_name: &str) -> Result<PathBuf, PdfTitleError> {
    let failed = |source: std::io::Error| PdfTitleError::QuarantineFailed {
        path: path.to_path_buf(),
        source,
    };

    if !std::fs::metadata(path).map_err(failed)?.is_file() {
        return Err(failed(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let file_name = path.file_name().ok_or_else(|| {
        failed(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no file name",
        ))
    })?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let error_dir = dir.join(dir_name);
    std::fs::create_dir_all(&error_dir).map_err(failed)?;

    let dest = unique::unique_path(&error_dir.join(file_name));
    warn!("Moving broken file to: {}", dest.display());
    std::fs::rename(path, &dest).map_err(failed)?;
    Ok(dest)
}

/// Get the store from config or fall back to [`LopdfStore`].
fn resolve_store(config: &RunConfig) -> Arc<dyn DocumentStore> {
    match config.store {
        Some(ref s) => Arc::clone(s),
        None => Arc::new(LopdfStore::new()),
    }
}

/// Run `f`, turning a panic into [`PdfTitleError::Panicked`].
fn supervised<F>(f: F) -> Result<FileOutcome, PdfTitleError>
where
    F: FnOnce() -> Result<FileOutcome, PdfTitleError>,
{
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| {
            Err(PdfTitleError::Panicked(panic_message(payload.as_ref())))
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn updated(identity: &ResolvedIdentity, written: &[MetadataField]) -> FileOutcome {
    let pick = |field: MetadataField, value: Option<&str>| {
        if written.contains(&field) {
            value.map(str::to_string)
        } else {
            None
        }
    };
    FileOutcome::MetadataUpdated {
        title: pick(MetadataField::Title, identity.title()),
        author: pick(MetadataField::Author, identity.author()),
    }
}
