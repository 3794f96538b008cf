use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("failed to load model: {0}")]
    ModelLoad(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction backends.
///
/// Implementors return one entry per page, in document order. A page whose
/// text cannot be extracted must be reported as an empty string rather than
/// an error; only a document that cannot be opened at all is an error.
pub trait PdfBackend: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, BackendError>;
}

/// Decoding parameters handed to a summarization backend when it is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    /// Minimum summary length, in model tokens.
    pub min_length: i64,
    /// Maximum summary length, in model tokens.
    pub max_length: i64,
    /// Sampled decoding. Always `false` for the pipeline; kept explicit so
    /// backends don't rely on their own defaults.
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            min_length: 30,
            max_length: 150,
            do_sample: false,
        }
    }
}

/// Trait for abstractive summarization backends.
///
/// The pipeline bounds the input before calling [`SummaryBackend::summarize`];
/// backends only run the model.
pub trait SummaryBackend: Send + Sync {
    /// Human-readable model identifier (e.g. `t5-small`).
    fn name(&self) -> &str;

    fn summarize(&self, text: &str) -> Result<String, BackendError>;
}
