use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use crate::error::ApiError;
use crate::handlers::analyze_blocking;
use crate::models::{AnalysisJson, SummarizeRequest};
use crate::state::AppState;

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<AnalysisJson>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::validation(e.body_text()))?;

    // A missing or null field is blank text; the pipeline rejects it.
    let text = req.text.unwrap_or_default();
    let analysis = analyze_blocking(state.pipeline.clone(), text).await?;
    Ok(Json(analysis.into()))
}
