//! Integration tests for [`ExtractorRegistry`] against real files on disk.
//!
//! PDF handling is exercised through a stub [`PdfBackend`] so the tests do
//! not depend on MuPDF or on binary fixtures.

use std::path::Path;

use synopsis_core::{BackendError, PdfBackend};
use synopsis_ingest::{ExtractError, ExtractorRegistry, PdfExtractor, PlainTextExtractor};

/// Returns canned page texts regardless of the file contents.
struct StubPdf(Vec<&'static str>);

impl PdfBackend for StubPdf {
    fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
        Ok(self.0.iter().map(|p| p.to_string()).collect())
    }
}

struct BrokenPdf;

impl PdfBackend for BrokenPdf {
    fn extract_pages(&self, _path: &Path) -> Result<Vec<String>, BackendError> {
        Err(BackendError::OpenError("no trailer".into()))
    }
}

fn registry_with(pdf: impl PdfBackend + 'static) -> ExtractorRegistry {
    ExtractorRegistry::new()
        .register("txt", PlainTextExtractor)
        .register("pdf", PdfExtractor::new(pdf))
}

#[test]
fn txt_is_read_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "  Line one.\nLine two.\n").unwrap();

    let text = registry_with(StubPdf(vec![])).extract(&path).unwrap();
    assert_eq!(text, "  Line one.\nLine two.\n");
}

#[test]
fn uppercase_extension_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("NOTES.TXT");
    std::fs::write(&path, "hello").unwrap();

    assert_eq!(registry_with(StubPdf(vec![])).extract(&path).unwrap(), "hello");
}

#[test]
fn zero_byte_txt_is_empty_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, b"").unwrap();

    let err = registry_with(StubPdf(vec![])).extract(&path).unwrap_err();
    assert!(matches!(err, ExtractError::EmptyExtraction));
    assert_eq!(err.to_string(), "Could not extract text from the file.");
}

#[test]
fn invalid_utf8_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    std::fs::write(&path, [0x63, 0x61, 0x66, 0xe9]).unwrap();

    let err = registry_with(StubPdf(vec![])).extract(&path).unwrap_err();
    assert!(matches!(err, ExtractError::Unreadable(_)));
}

#[test]
fn pdf_pages_concatenate_without_separator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let registry = registry_with(StubPdf(vec!["First page.", "", "Third page."]));
    assert_eq!(registry.extract(&path).unwrap(), "First page.Third page.");
}

#[test]
fn pdf_with_no_text_on_any_page_is_empty_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let registry = registry_with(StubPdf(vec!["", " \n", ""]));
    assert!(matches!(
        registry.extract(&path).unwrap_err(),
        ExtractError::EmptyExtraction
    ));
}

#[test]
fn unopenable_pdf_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"garbage").unwrap();

    assert!(matches!(
        registry_with(BrokenPdf).extract(&path).unwrap_err(),
        ExtractError::Unreadable(_)
    ));
}

#[test]
fn unknown_and_missing_extensions_are_unsupported() {
    let registry = registry_with(StubPdf(vec![]));
    for name in ["slides.pptx", "README"] {
        let err = registry.extract(Path::new(name)).unwrap_err();
        assert!(
            matches!(err, ExtractError::UnsupportedFormat { .. }),
            "{name} should be unsupported"
        );
    }
}

#[test]
fn extractor_does_not_delete_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keep.txt");
    std::fs::write(&path, "content").unwrap();

    registry_with(StubPdf(vec![])).extract(&path).unwrap();
    assert!(path.exists());
}
