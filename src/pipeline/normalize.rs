//! Normalisation: rename a document to `<Title>-<Author><ext>`.
//!
//! Steps run strictly in order and each must succeed before the next starts:
//!
//! 1. Sanitise Title and Author independently
//! 2. Compose the desired name in the source's directory
//! 3. Stop if the file already has that name
//! 4. Write `Normalized=true` into the document
//! 5. Pick a collision-free destination
//! 6. Rename
//!
//! Nothing is rolled back: if the rename fails, the marker written in step 4
//! stays in the file.

use crate::error::PdfTitleError;
use crate::output::{FileOutcome, MetadataField};
use crate::pipeline::sanitize::sanitize;
use crate::pipeline::unique::unique_path;
use crate::store::DocumentStore;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Value stored under the custom `Normalized` key.
pub const NORMALIZED_MARKER: &str = "true";

/// Build `<sanitised title>-<sanitised author><ext>` beside `path`.
pub fn desired_path(path: &Path, title: &str, author: &str) -> PathBuf {
    let mut name = OsString::from(format!("{}-{}", sanitize(title), sanitize(author)));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    match path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Rename `path` after its own Title and Author metadata.
///
/// Never fills in missing metadata; a document without both fields fails
/// with [`PdfTitleError::MissingMetadata`].
pub fn normalize(store: &dyn DocumentStore, path: &Path) -> Result<FileOutcome, PdfTitleError> {
    let meta = store.read_metadata(path)?;

    let (title, author) = match (meta.title(), meta.author()) {
        (Some(t), Some(a)) => (t, a),
        _ => {
            return Err(PdfTitleError::MissingMetadata {
                path: path.to_path_buf(),
                title: meta.title.clone(),
                author: meta.author.clone(),
            })
        }
    };

    let desired = desired_path(path, title, author);
    if desired == path {
        info!("{} is already normalized", path.display());
        return Ok(FileOutcome::AlreadyNormalized);
    }

    store.write_metadata(path, MetadataField::Normalized, NORMALIZED_MARKER)?;

    let target = unique_path(&desired);
    info!("Renaming '{}' to '{}'", path.display(), target.display());
    std::fs::rename(path, &target).map_err(|source| PdfTitleError::RenameFailed {
        from: path.to_path_buf(),
        to: target.clone(),
        source,
    })?;

    Ok(FileOutcome::Renamed {
        from: path.to_path_buf(),
        to: target,
    })
}
