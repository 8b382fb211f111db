//! Document-model backend: read/write the /Info dictionary and page text.
//!
//! The pipeline only talks to the [`DocumentStore`] trait. Every call takes a
//! path and goes back to disk, so nothing read for one file can leak into the
//! next. [`LopdfStore`] is the default backend; tests plug in an in-memory
//! double through [`crate::config::RunConfigBuilder::store`].

use crate::error::PdfTitleError;
use crate::output::{DocumentMetadata, MetadataField};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::path::Path;
use tracing::debug;

/// Read/write access to a document's metadata dictionary and content.
pub trait DocumentStore: Send + Sync {
    /// Read all [`MetadataField`]s. A document without an info dictionary
    /// yields all-`None` metadata.
    fn read_metadata(&self, path: &Path) -> Result<DocumentMetadata, PdfTitleError>;

    /// Set a single key and persist the document.
    fn write_metadata(
        &self,
        path: &Path,
        field: MetadataField,
        value: &str,
    ) -> Result<(), PdfTitleError>;

    /// Set several keys. Backends that can save once should override this.
    fn write_fields(
        &self,
        path: &Path,
        fields: &[(MetadataField, &str)],
    ) -> Result<(), PdfTitleError> {
        for (field, value) in fields {
            self.write_metadata(path, *field, value)?;
        }
        Ok(())
    }

    /// Plain text of page 1, or `None` for a document without pages.
    fn extract_first_page_text(&self, path: &Path) -> Result<Option<String>, PdfTitleError>;
}

/// [`DocumentStore`] backed by the pure-Rust `lopdf` object model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfStore;

impl LopdfStore {
    pub fn new() -> Self {
        Self
    }

    fn load(path: &Path) -> Result<Document, PdfTitleError> {
        Document::load(path).map_err(|e| PdfTitleError::CorruptPdf {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Resolve the trailer's /Info entry, if any.
    fn info_dict<'a>(
        doc: &'a Document,
        path: &Path,
    ) -> Result<Option<&'a Dictionary>, PdfTitleError> {
        let info = match doc.trailer.get(b"Info") {
            Ok(obj) => obj,
            Err(_) => return Ok(None),
        };
        let corrupt = |detail: String| PdfTitleError::CorruptPdf {
            path: path.to_path_buf(),
            detail,
        };
        match info {
            Object::Reference(id) => doc
                .get_dictionary(*id)
                .map(Some)
                .map_err(|e| corrupt(format!("cannot dereference /Info {id:?}: {e}"))),
            Object::Dictionary(dict) => Ok(Some(dict)),
            _ => Err(corrupt("/Info is not a dictionary".to_string())),
        }
    }

    /// Find or create the indirect /Info dictionary and return its id.
    fn ensure_info_id(doc: &mut Document) -> ObjectId {
        if let Ok(id) = doc.trailer.get(b"Info").and_then(Object::as_reference) {
            if doc.get_dictionary(id).is_ok() {
                return id;
            }
        }
        // Inline or missing /Info: move the entries into a fresh indirect object.
        let existing = match doc.trailer.get(b"Info") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        };
        let id = doc.add_object(existing);
        doc.trailer.set("Info", Object::Reference(id));
        id
    }

    /// Save next to the original and rename over it.
    fn save_atomic(doc: &mut Document, path: &Path, key: &str) -> Result<(), PdfTitleError> {
        let write_err = |detail: String| PdfTitleError::MetadataWriteFailed {
            path: path.to_path_buf(),
            key: key.to_string(),
            detail,
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::Builder::new()
            .prefix(".pdftitle-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| write_err(format!("cannot create temp file: {e}")))?;

        doc.save_to(tmp.as_file_mut())
            .map_err(|e| write_err(e.to_string()))?;
        // The temp file is created 0600; carry the original mode over.
        let permissions = std::fs::metadata(path)
            .map_err(|e| write_err(format!("cannot stat original: {e}")))?
            .permissions();
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| write_err(format!("cannot copy permissions: {e}")))?;
        tmp.persist(path)
            .map_err(|e| write_err(format!("cannot replace original: {}", e.error)))?;
        Ok(())
    }
}

impl DocumentStore for LopdfStore {
    fn read_metadata(&self, path: &Path) -> Result<DocumentMetadata, PdfTitleError> {
        let doc = Self::load(path)?;
        let mut meta = DocumentMetadata::default();

        let Some(dict) = Self::info_dict(&doc, path)? else {
            debug!("No /Info dictionary in {}", path.display());
            return Ok(meta);
        };

        for field in MetadataField::ALL {
            let value = dict
                .get(field.key().as_bytes())
                .ok()
                .and_then(|obj| match obj {
                    Object::String(bytes, _) => Some(decode_text_string(bytes)),
                    _ => None,
                });
            field.assign(&mut meta, value);
        }
        Ok(meta)
    }

    fn write_metadata(
        &self,
        path: &Path,
        field: MetadataField,
        value: &str,
    ) -> Result<(), PdfTitleError> {
        self.write_fields(path, &[(field, value)])
    }

    fn write_fields(
        &self,
        path: &Path,
        fields: &[(MetadataField, &str)],
    ) -> Result<(), PdfTitleError> {
        if fields.is_empty() {
            return Ok(());
        }
        let keys = fields
            .iter()
            .map(|(f, _)| f.key())
            .collect::<Vec<_>>()
            .join(",");

        let mut doc = Self::load(path)?;
        let info_id = Self::ensure_info_id(&mut doc);
        let dict = doc
            .get_object_mut(info_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| PdfTitleError::MetadataWriteFailed {
                path: path.to_path_buf(),
                key: keys.clone(),
                detail: e.to_string(),
            })?;

        for (field, value) in fields {
            dict.set(field.key(), encode_text_string(value));
        }
        debug!("Writing {} to {}", keys, path.display());
        Self::save_atomic(&mut doc, path, &keys)
    }

    fn extract_first_page_text(&self, path: &Path) -> Result<Option<String>, PdfTitleError> {
        let doc = Self::load(path)?;
        if doc.get_pages().is_empty() {
            return Ok(None);
        }
        doc.extract_text(&[1])
            .map(Some)
            .map_err(|e| PdfTitleError::CorruptPdf {
                path: path.to_path_buf(),
                detail: format!("text extraction failed: {e}"),
            })
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8, or a Latin-1 fallback.
pub(crate) fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Encode a value as a PDF text string: literal for ASCII, UTF-16BE otherwise.
pub(crate) fn encode_text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
