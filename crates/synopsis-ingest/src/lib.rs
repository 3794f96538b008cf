use std::path::Path;

use thiserror::Error;

use synopsis_core::{BackendError, PdfBackend};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Unsupported file type. Please upload {}", supported_list(.supported))]
    UnsupportedFormat {
        extension: String,
        supported: Vec<String>,
    },
    #[error("Could not extract text from the file.")]
    EmptyExtraction,
    #[error("Could not read the file: {0}")]
    Unreadable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BackendError> for ExtractError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Io(io) => ExtractError::Io(io),
            other => ExtractError::Unreadable(other.to_string()),
        }
    }
}

fn supported_list(supported: &[String]) -> String {
    supported
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// One way of turning a file into text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// `.txt`: the file's bytes decoded as UTF-8, verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes)
            .map_err(|e| ExtractError::Unreadable(format!("file is not valid UTF-8: {e}")))
    }
}

/// `.pdf`: page texts in document order, concatenated with no separator.
pub struct PdfExtractor<B> {
    backend: B,
}

impl<B: PdfBackend> PdfExtractor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: PdfBackend> TextExtractor for PdfExtractor<B> {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let pages = self.backend.extract_pages(path)?;
        tracing::debug!(pages = pages.len(), path = %path.display(), "extracted PDF pages");
        Ok(pages.concat())
    }
}

/// Maps lowercase file extensions to extraction strategies.
///
/// Registration order is preserved and used when listing supported types.
#[derive(Default)]
pub struct ExtractorRegistry {
    entries: Vec<(String, Box<dyn TextExtractor>)>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `.txt` plus, with the `pdf` feature, `.pdf` via MuPDF.
    pub fn with_defaults() -> Self {
        let registry = Self::new().register("txt", PlainTextExtractor);
        #[cfg(feature = "pdf")]
        let registry = registry.register(
            "pdf",
            PdfExtractor::new(synopsis_pdf_mupdf::MupdfBackend::new()),
        );
        registry
    }

    /// Register `extractor` for `extension` (without the dot). A later
    /// registration for the same extension replaces the earlier one.
    pub fn register(mut self, extension: &str, extractor: impl TextExtractor + 'static) -> Self {
        let ext = normalize_extension(extension);
        self.entries.retain(|(e, _)| *e != ext);
        self.entries.push((ext, Box::new(extractor)));
        self
    }

    pub fn supported_extensions(&self) -> Vec<String> {
        self.entries.iter().map(|(ext, _)| ext.clone()).collect()
    }

    pub fn lookup(&self, extension: &str) -> Option<&dyn TextExtractor> {
        let ext = normalize_extension(extension);
        self.entries
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, extractor)| extractor.as_ref())
    }

    /// Extract text from `path`, dispatching on its extension.
    ///
    /// Fails with [`ExtractError::EmptyExtraction`] when the document parsed
    /// but contained only whitespace.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let extractor = self
            .lookup(&ext)
            .ok_or_else(|| ExtractError::UnsupportedFormat {
                extension: ext.clone(),
                supported: self.supported_extensions(),
            })?;

        let text = extractor.extract(path)?;
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyExtraction);
        }
        Ok(text)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}
