//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events as
//! the batch runner works through its input list. The library itself never
//! prints; the `pdftitle` binary renders these events as banners and a
//! progress bar.
//!
//! # Example
//!
//! ```rust
//! use pdftitle::{BatchProgressCallback, RunConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     started: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_file_start(&self, index: usize, total: usize, path: &Path) {
//!         self.started.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("[{}/{}] {}", index + 1, total, path.display());
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { started: AtomicUsize::new(0) });
//! let config = RunConfig::builder()
//!     .progress_callback(cb as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::PdfTitleError;
use crate::output::{BatchSummary, FileOutcome};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch runner as it processes each file.
///
/// Files are handled strictly one at a time, so calls never overlap; the
/// `Send + Sync` bound only lets a callback be shared through the config.
/// All methods have default no-op implementations.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before the first file.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a file is processed.
    ///
    /// # Arguments
    /// * `index` — 0-indexed position in the input list
    /// * `total` — number of files in the batch
    fn on_file_start(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// Called when a file was processed without error.
    fn on_file_complete(&self, index: usize, total: usize, path: &Path, outcome: &FileOutcome) {
        let _ = (index, total, path, outcome);
    }

    /// Called when processing a file failed, before it is quarantined.
    fn on_file_error(&self, index: usize, total: usize, path: &Path, error: &PdfTitleError) {
        let _ = (index, total, path, error);
    }

    /// Called after a failed file was moved into quarantine.
    fn on_quarantined(&self, path: &Path, destination: &Path) {
        let _ = (path, destination);
    }

    /// Called when the quarantine move itself failed; the file stays in place.
    fn on_quarantine_failed(&self, path: &Path, error: &PdfTitleError) {
        let _ = (path, error);
    }

    /// Called once after every file was attempted.
    fn on_batch_complete(&self, summary: &BatchSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
