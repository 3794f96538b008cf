use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod keywords;
pub mod pipeline;

// Re-export for convenience
pub use backend::{BackendError, GenerationParams, PdfBackend, SummaryBackend};
pub use config_file::{ConfigFile, Settings, load_config};
pub use keywords::{KeywordError, ScoredTerm, TfidfRanker};
pub use pipeline::{Pipeline, PipelineSettings, truncate_tokens};

/// Summary and keywords computed for one input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub summary: String,
    pub keywords: Vec<String>,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing or blank input.
    #[error("{0}")]
    Validation(String),
    /// The model failed its single load attempt at startup.
    #[error("Summarization model is not loaded: {0}")]
    ModelUnavailable(String),
    #[error("Error during summarization: {0}")]
    Inference(String),
}
