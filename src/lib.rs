//! # pdftitle
//!
//! Give every PDF in a pile a Title and Author, then rename it to a
//! predictable, filesystem-safe `<Title>-<Author>.pdf`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! paths
//!  │
//!  ├─ 1. Input      check each path is a readable %PDF file
//!  ├─ 2. Resolve    override → existing metadata → page text → filename → default
//!  ├─ 3. Persist    write back only freshly derived fields
//!  ├─ 4. Normalize  sanitise Title/Author, pick a free name, mark, rename
//!  └─ 5. Quarantine failed files move to a sibling `error/` directory
//! ```
//!
//! Files are processed one at a time in input order. A failure (or panic) in
//! one file is reported and quarantined; the rest of the batch still runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftitle::{run_batch, RunConfig};
//!
//! // Fill in missing Title/Author from file names.
//! run_batch(&["my_report-final.pdf"], &RunConfig::default());
//!
//! // Then rename to `<Title>-<Author>.pdf`.
//! let config = RunConfig::builder().normalize(true).build().unwrap();
//! let summary = run_batch(&["my_report-final.pdf"], &config);
//! for report in &summary.reports {
//!     println!("{} → {}", report.path.display(), report.final_path().display());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdftitle` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdftitle = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{process_file, process_file_with, quarantine, run_batch};
pub use config::{RunConfig, RunConfigBuilder, DEFAULT_AUTHOR, DEFAULT_QUARANTINE_DIR};
pub use error::PdfTitleError;
pub use output::{BatchSummary, DocumentMetadata, FileOutcome, FileReport, MetadataField};
pub use pipeline::normalize::{desired_path, normalize};
pub use pipeline::resolve::{FieldSource, MetadataResolver, ResolvedField, ResolvedIdentity};
pub use pipeline::sanitize::sanitize;
pub use pipeline::unique::unique_path;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use store::{DocumentStore, LopdfStore};
