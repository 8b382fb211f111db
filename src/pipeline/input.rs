//! Input validation: make sure a path names a readable PDF before touching it.
//!
//! Checking the `%PDF` magic bytes up front gives the user a precise error
//! ("not a PDF") instead of whatever the parser reports on garbage.

use crate::error::PdfTitleError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local file path, checking existence, readability and PDF magic bytes.
pub fn resolve_input(path: &Path) -> Result<PathBuf, PdfTitleError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(PdfTitleError::FileNotFound { path });
    }
    if !path.is_file() {
        return Err(PdfTitleError::NotAFile { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
                return Err(PdfTitleError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfTitleError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfTitleError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Parse newline-delimited paths, skipping blank lines.
///
/// Works on raw bytes: file names need not be UTF-8, and one odd entry must
/// not reject the rest of the list.
pub fn parse_path_list(bytes: &[u8]) -> Vec<PathBuf> {
    bytes
        .split(|&b| b == b'\n')
        .map(<[u8]>::trim_ascii)
        .filter(|l| !l.is_empty())
        .map(path_from_bytes)
        .collect()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
