use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::models::HealthJson;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthJson> {
    Json(HealthJson {
        status: "ok",
        model_loaded: state.pipeline.is_ready(),
        model: state.pipeline.model_name().map(str::to_string),
    })
}
