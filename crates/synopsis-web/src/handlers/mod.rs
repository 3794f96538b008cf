pub mod health;
pub mod index;
pub mod summarize;
pub mod upload;

use std::sync::Arc;

use synopsis_core::{Analysis, Pipeline};

use crate::error::ApiError;

/// Run the pipeline off the async runtime; inference is CPU-bound.
pub(crate) async fn analyze_blocking(
    pipeline: Arc<Pipeline>,
    text: String,
) -> Result<Analysis, ApiError> {
    tokio::task::spawn_blocking(move || pipeline.analyze(&text))
        .await
        .map_err(|e| ApiError::internal(format!("Summarization task error: {}", e)))?
        .map_err(ApiError::from)
}
