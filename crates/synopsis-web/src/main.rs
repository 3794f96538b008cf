use std::net::SocketAddr;
use std::sync::Arc;

use synopsis_core::{Pipeline, Settings};
use synopsis_ingest::ExtractorRegistry;
use synopsis_web::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = synopsis_core::load_config().resolve().apply_env();

    let default_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    std::fs::create_dir_all(&settings.upload_dir)?;

    // Single load attempt; on failure the server keeps running degraded
    let pipeline = {
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || load_pipeline(&settings)).await?
    };

    let state = Arc::new(AppState {
        pipeline: Arc::new(pipeline),
        extractors: Arc::new(ExtractorRegistry::with_defaults()),
        upload_dir: settings.upload_dir.clone(),
    });

    let max_upload_bytes = settings.max_upload_mb as usize * 1024 * 1024;
    let app = router(state, max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    tracing::info!(%addr, debug = settings.debug, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "rust-bert")]
fn load_pipeline(settings: &Settings) -> Pipeline {
    let loaded = synopsis_rust_bert::RustBertSummarizer::load_named(
        &settings.model_name,
        settings.generation,
    );
    Pipeline::from_load(loaded, settings.pipeline)
}

#[cfg(not(feature = "rust-bert"))]
fn load_pipeline(settings: &Settings) -> Pipeline {
    tracing::warn!("built without a summarization backend (enable the `rust-bert` feature)");
    Pipeline::unavailable("no summarization backend compiled in", settings.pipeline)
}
