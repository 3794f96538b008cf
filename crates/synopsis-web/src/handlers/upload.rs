use axum::Json;
use axum::extract::{Multipart, State};
use std::path::PathBuf;
use std::sync::Arc;

use synopsis_ingest::ExtractorRegistry;

use crate::error::ApiError;
use crate::handlers::analyze_blocking;
use crate::models::AnalysisJson;
use crate::state::AppState;
use crate::upload::{self, TransientUpload};

pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalysisJson>, ApiError> {
    let file = upload::parse_multipart(multipart)
        .await?
        .ok_or_else(|| ApiError::validation("No file part"))?;

    if file.filename.is_empty() {
        return Err(ApiError::validation("No selected file"));
    }

    let artifact = TransientUpload::write(&state.upload_dir, &file.filename, &file.data)?;
    tracing::info!(filename = %file.filename, bytes = file.data.len(), "received upload");

    let text = extract_blocking(state.extractors.clone(), artifact.path().to_path_buf()).await;

    // Artifact no longer needed after extraction, whatever the outcome
    drop(artifact);

    let text = text?;
    let analysis = analyze_blocking(state.pipeline.clone(), text).await?;
    Ok(Json(analysis.into()))
}

async fn extract_blocking(
    extractors: Arc<ExtractorRegistry>,
    path: PathBuf,
) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || extractors.extract(&path))
        .await
        .map_err(|e| ApiError::internal(format!("Extraction task error: {}", e)))?
        .map_err(ApiError::from)
}
