use std::path::Path;

use mupdf::{Document, Page, TextPageFlags};

use synopsis_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate isolates the mupdf dependency (AGPL-3.0) so that the plain
/// text path does not transitively depend on it.
///
/// Each page becomes one string: its lines joined by `\n`. A page that
/// MuPDF cannot load or convert yields an empty string instead of failing
/// the whole document.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        for (index, page_result) in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
            .enumerate()
        {
            let text = page_result
                .map_err(|e| e.to_string())
                .and_then(|page| page_text(&page));
            match text {
                Ok(text) => pages_text.push(text),
                Err(e) => {
                    tracing::debug!(page = index + 1, error = %e, "page text extraction failed");
                    pages_text.push(String::new());
                }
            }
        }

        Ok(pages_text)
    }
}

fn page_text(page: &Page) -> Result<String, String> {
    let text_page = page
        .to_text_page(TextPageFlags::empty())
        .map_err(|e| e.to_string())?;

    let mut lines: Vec<String> = Vec::new();
    for block in text_page.blocks() {
        for line in block.lines() {
            lines.push(
                line.chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect(),
            );
        }
    }

    Ok(lines.join("\n"))
}
