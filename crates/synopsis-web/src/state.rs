use std::path::PathBuf;
use std::sync::Arc;

use synopsis_core::Pipeline;
use synopsis_ingest::ExtractorRegistry;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub extractors: Arc<ExtractorRegistry>,
    /// Root under which each upload gets its own short-lived directory.
    pub upload_dir: PathBuf,
}
