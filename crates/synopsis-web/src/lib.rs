//! HTTP surface for the summarization pipeline.
//!
//! `POST /summarize` takes `{"text": ...}`, `POST /upload` takes a multipart
//! `file` (`.txt` or `.pdf`). Both answer `{"summary", "keywords"}` or
//! `{"error"}`.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod template;
pub mod upload;

pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::health::health))
        .route("/summarize", post(handlers::summarize::summarize))
        .route("/upload", post(handlers::upload::upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
