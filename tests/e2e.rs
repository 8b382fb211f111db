//! End-to-end tests for pdftitle.
//!
//! These tests build small real PDFs with lopdf in a temporary directory and
//! run whole batches through the default [`LopdfStore`] backend, so they
//! exercise actual metadata reads, writes and renames on disk.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdftitle::{
    process_file, run_batch, DocumentStore, FileOutcome, LopdfStore, MetadataField, PdfTitleError,
    RunConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Write a one-page PDF, optionally with Title/Author in its /Info dictionary.
fn write_pdf(dir: &Path, name: &str, title: Option<&str>, author: Option<&str>) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal("Hello World")]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if title.is_some() || author.is_some() {
        let mut info = lopdf::Dictionary::new();
        if let Some(t) = title {
            info.set("Title", Object::string_literal(t));
        }
        if let Some(a) = author {
            info.set("Author", Object::string_literal(a));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);
    }

    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

fn read(path: &Path) -> pdftitle::DocumentMetadata {
    LopdfStore::new().read_metadata(path).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn normalize_config() -> RunConfig {
    RunConfig::builder().normalize(true).build().unwrap()
}

// ── Store round-trips ────────────────────────────────────────────────────────

#[test]
fn test_read_document_without_info() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "plain.pdf", None, None);
    let meta = read(&p);
    assert_eq!(meta.title(), None);
    assert_eq!(meta.author(), None);
}

#[test]
fn test_write_creates_info_and_keeps_other_keys() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "plain.pdf", None, None);
    let store = LopdfStore::new();

    store.write_metadata(&p, MetadataField::Title, "Peña").unwrap();
    store.write_metadata(&p, MetadataField::Subject, "Notes").unwrap();

    let meta = read(&p);
    assert_eq!(meta.title(), Some("Peña"));
    assert_eq!(meta.subject.as_deref(), Some("Notes"));
    // No stray temp files left behind.
    assert_eq!(file_names(dir.path()), vec!["plain.pdf"]);
}

#[test]
fn test_title_from_first_page_text() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "scan_0001.pdf", None, None);
    let config = RunConfig::builder()
        .title_from_content(true)
        .build()
        .unwrap();

    let outcome = process_file(&p, &config).unwrap();
    assert_eq!(
        outcome,
        FileOutcome::MetadataUpdated {
            title: Some("Hello World".into()),
            author: Some("NIF".into()),
        }
    );
    assert_eq!(read(&p).title(), Some("Hello World"));
}

#[cfg(unix)]
#[test]
fn test_metadata_write_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "shared.pdf", None, None);
    fs::set_permissions(&p, fs::Permissions::from_mode(0o644)).unwrap();

    process_file(&p, &RunConfig::default()).unwrap();

    let mode = fs::metadata(&p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert_eq!(read(&p).author(), Some("NIF"));
}

// ── Default mode ─────────────────────────────────────────────────────────────

#[test]
fn test_auto_fill_from_filename() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "my_report-final.pdf", None, None);

    let outcome = process_file(&p, &RunConfig::default()).unwrap();
    assert_eq!(
        outcome,
        FileOutcome::MetadataUpdated {
            title: Some("my report final".into()),
            author: Some("NIF".into()),
        }
    );
    let meta = read(&p);
    assert_eq!(meta.title(), Some("my report final"));
    assert_eq!(meta.author(), Some("NIF"));
}

#[test]
fn test_existing_title_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "whatever.pdf", Some("Dune"), None);

    let outcome = process_file(&p, &RunConfig::default()).unwrap();
    assert!(matches!(outcome, FileOutcome::Inspected(ref m) if m.title() == Some("Dune")));
    assert_eq!(read(&p).author(), None);
}

#[test]
fn test_explicit_override() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "x.pdf", Some("Old"), Some("Someone"));
    let config = RunConfig::builder()
        .title_override("New Title")
        .build()
        .unwrap();

    process_file(&p, &config).unwrap();
    let meta = read(&p);
    assert_eq!(meta.title(), Some("New Title"));
    assert_eq!(meta.author(), Some("Someone"));
}

// ── Normalize mode ───────────────────────────────────────────────────────────

#[test]
fn test_normalize_renames_and_marks() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "scan 01.pdf", Some("C++ Primer"), Some("Peña"));

    let outcome = process_file(&p, &normalize_config()).unwrap();
    let expected = dir.path().join("CPlusPlus_Primer-Pegna.pdf");
    assert_eq!(
        outcome,
        FileOutcome::Renamed {
            from: p.clone(),
            to: expected.clone(),
        }
    );
    assert!(!p.exists());
    assert!(read(&expected).is_normalized());
}

#[test]
fn test_normalize_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "a.pdf", Some("Dune"), Some("Herbert"));
    let config = normalize_config();

    let first = process_file(&p, &config).unwrap();
    let FileOutcome::Renamed { to, .. } = first else {
        panic!("expected a rename");
    };
    let second = process_file(&to, &config).unwrap();
    assert_eq!(second, FileOutcome::AlreadyNormalized);
    assert_eq!(file_names(dir.path()), vec!["Dune-Herbert.pdf"]);
}

#[test]
fn test_normalize_without_author_fails() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "a.pdf", Some("Dune"), None);

    let err = process_file(&p, &normalize_config()).unwrap_err();
    assert!(matches!(err, PdfTitleError::MissingMetadata { .. }));
    assert!(!read(&p).is_normalized(), "normalize must not write on failure");
}

#[test]
fn test_colliding_names_never_overwrite() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "first.pdf", Some("Dune"), Some("Herbert"));
    let b = write_pdf(dir.path(), "second.pdf", Some("Dune!"), Some("Herbert"));

    let summary = run_batch(&[&a, &b], &normalize_config());
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(
        file_names(dir.path()),
        vec!["Dune-Herbert.pdf", "Dune-Herbert_1.pdf"]
    );
}

// ── Batch & quarantine ───────────────────────────────────────────────────────

#[test]
fn test_quarantine_isolation() {
    let dir = TempDir::new().unwrap();
    let one = write_pdf(dir.path(), "one.pdf", None, None);
    let two = dir.path().join("two.pdf");
    fs::write(&two, b"%PDF-1.4\nthis is not really a pdf").unwrap();
    let three = write_pdf(dir.path(), "three.pdf", None, None);

    // A same-named file is already waiting in quarantine.
    fs::create_dir(dir.path().join("error")).unwrap();
    fs::write(dir.path().join("error").join("two.pdf"), b"older").unwrap();

    let summary = run_batch(&[&one, &two, &three], &RunConfig::default());
    assert_eq!(summary.total(), 3);
    assert!(summary.reports[0].is_success());
    assert!(summary.reports[2].is_success());

    let failed = &summary.reports[1];
    assert!(failed.result.as_ref().unwrap_err().is_read_failure());
    assert_eq!(
        failed.quarantined_to.as_deref(),
        Some(dir.path().join("error").join("two_1.pdf").as_path())
    );
    assert_eq!(
        fs::read(dir.path().join("error").join("two.pdf")).unwrap(),
        b"older"
    );

    assert_eq!(read(&one).title(), Some("one"));
    assert_eq!(read(&three).title(), Some("three"));
}

#[test]
fn test_non_pdf_is_quarantined() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("notes.pdf");
    fs::write(&p, b"just some text").unwrap();

    let summary = run_batch(&[&p], &RunConfig::default());
    assert!(matches!(
        summary.reports[0].result,
        Err(PdfTitleError::NotAPdf { .. })
    ));
    assert!(dir.path().join("error").join("notes.pdf").exists());
}

#[test]
fn test_custom_quarantine_dir() {
    let dir = TempDir::new().unwrap();
    let p = dir.path().join("bad.pdf");
    fs::write(&p, b"nope").unwrap();
    let config = RunConfig::builder()
        .quarantine_dir_name("failed")
        .build()
        .unwrap();

    let summary = run_batch(&[&p], &config);
    assert_eq!(summary.quarantined(), 1);
    assert!(dir.path().join("failed").join("bad.pdf").exists());
}

#[test]
fn test_two_step_fill_then_normalize() {
    let dir = TempDir::new().unwrap();
    let p = write_pdf(dir.path(), "my_report-final.pdf", None, None);

    run_batch(&[&p], &RunConfig::default());
    let summary = run_batch(&[&p], &normalize_config());

    assert_eq!(
        summary.reports[0].final_path(),
        dir.path().join("my_report_final-NIF.pdf").as_path()
    );
}

/// Panics while reading one particular file, delegates to lopdf otherwise.
struct PanicsOn(PathBuf);

impl DocumentStore for PanicsOn {
    fn read_metadata(&self, path: &Path) -> Result<pdftitle::DocumentMetadata, PdfTitleError> {
        if path == self.0 {
            panic!("malformed cross-reference table");
        }
        LopdfStore::new().read_metadata(path)
    }

    fn write_metadata(
        &self,
        path: &Path,
        field: MetadataField,
        value: &str,
    ) -> Result<(), PdfTitleError> {
        LopdfStore::new().write_metadata(path, field, value)
    }

    fn extract_first_page_text(&self, path: &Path) -> Result<Option<String>, PdfTitleError> {
        LopdfStore::new().extract_first_page_text(path)
    }
}

#[test]
fn test_panic_in_one_file_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    let one = write_pdf(dir.path(), "one.pdf", None, None);
    let two = write_pdf(dir.path(), "two.pdf", None, None);
    let three = write_pdf(dir.path(), "three.pdf", None, None);
    let config = RunConfig::builder()
        .store(Arc::new(PanicsOn(two.clone())))
        .build()
        .unwrap();

    let summary = run_batch(&[&one, &two, &three], &config);
    assert_eq!(summary.succeeded(), 2);
    assert!(matches!(
        summary.reports[1].result,
        Err(PdfTitleError::Panicked(ref msg)) if msg.contains("cross-reference")
    ));
    assert!(dir.path().join("error").join("two.pdf").exists());
    assert_eq!(read(&three).author(), Some("NIF"));
}
