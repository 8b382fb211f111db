//! Collision-free destination paths.
//!
//! The check is existence-based and happens immediately before the caller
//! acts on the result. Two processes racing over the same directory can still
//! pick the same name; only single-process, sequential use is supported.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Return `desired` if nothing exists there, otherwise the first free
/// `<stem>_<n><ext>` sibling for `n = 1, 2, …`.
///
/// A dangling symlink counts as taken, so the result never replaces a
/// directory entry of any kind.
pub fn unique_path(desired: &Path) -> PathBuf {
    if !is_taken(desired) {
        return desired.to_path_buf();
    }

    let parent = desired.parent().unwrap_or_else(|| Path::new(""));
    let stem = desired.file_stem().map(OsString::from).unwrap_or_default();
    let ext = desired.extension();

    (1u64..)
        .map(|n| {
            let mut name = stem.clone();
            name.push(format!("_{n}"));
            if let Some(ext) = ext {
                name.push(".");
                name.push(ext);
            }
            parent.join(name)
        })
        .find(|candidate| !is_taken(candidate))
        .map(|free| {
            debug!(
                "{} exists, using {}",
                desired.display(),
                free.display()
            );
            free
        })
        .unwrap_or_else(|| desired.to_path_buf())
}

fn is_taken(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn free_path_is_returned_unchanged() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("Dune-Herbert.pdf");
        assert_eq!(unique_path(&p), p);
    }

    #[test]
    fn first_collision_gets_suffix_one() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("Dune-Herbert.pdf");
        fs::write(&p, b"x").unwrap();
        assert_eq!(unique_path(&p), dir.path().join("Dune-Herbert_1.pdf"));
    }

    #[test]
    fn counter_increments_until_free() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("a.pdf");
        for name in ["a.pdf", "a_1.pdf", "a_2.pdf"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let got = unique_path(&p);
        assert_eq!(got, dir.path().join("a_3.pdf"));
        assert!(!got.exists());
    }

    #[test]
    fn gaps_are_reused() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.pdf"), b"x").unwrap();
        fs::write(dir.path().join("a_2.pdf"), b"x").unwrap();
        assert_eq!(
            unique_path(&dir.path().join("a.pdf")),
            dir.path().join("a_1.pdf")
        );
    }

    #[test]
    fn no_extension() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("README");
        fs::write(&p, b"x").unwrap();
        assert_eq!(unique_path(&p), dir.path().join("README_1"));
    }

    #[test]
    fn existing_directory_counts_as_taken() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("error");
        fs::create_dir(&p).unwrap();
        assert_eq!(unique_path(&p), dir.path().join("error_1"));
    }
}
