use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::GenerationParams;
use crate::keywords::DEFAULT_KEYWORD_COUNT;
use crate::pipeline::PipelineSettings;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub model: Option<ModelConfig>,
    pub keywords: Option<KeywordsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: Option<bool>,
    pub upload_dir: Option<String>,
    pub max_upload_mb: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: Option<String>,
    pub max_input_tokens: Option<usize>,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordsConfig {
    pub count: Option<usize>,
}

/// Fully resolved settings, defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub upload_dir: PathBuf,
    pub max_upload_mb: u32,
    pub model_name: String,
    pub generation: GenerationParams,
    pub pipeline: PipelineSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            debug: false,
            upload_dir: PathBuf::from("uploads"),
            max_upload_mb: 16,
            model_name: "t5-small".to_string(),
            generation: GenerationParams::default(),
            pipeline: PipelineSettings::default(),
        }
    }
}

impl ConfigFile {
    /// Fill unset fields from [`Settings::default`].
    pub fn resolve(&self) -> Settings {
        let d = Settings::default();
        let server = self.server.clone().unwrap_or_default();
        let model = self.model.clone().unwrap_or_default();
        let keywords = self.keywords.clone().unwrap_or_default();

        Settings {
            host: server.host.unwrap_or(d.host),
            port: server.port.unwrap_or(d.port),
            debug: server.debug.unwrap_or(d.debug),
            upload_dir: server.upload_dir.map(PathBuf::from).unwrap_or(d.upload_dir),
            max_upload_mb: server.max_upload_mb.unwrap_or(d.max_upload_mb),
            model_name: model.name.unwrap_or(d.model_name),
            generation: summary_band(model.min_length, model.max_length),
            pipeline: PipelineSettings {
                max_input_tokens: model
                    .max_input_tokens
                    .unwrap_or(d.pipeline.max_input_tokens),
                keyword_count: keywords
                    .count
                    .map(clamp_keyword_count)
                    .unwrap_or(d.pipeline.keyword_count),
            },
        }
    }
}

/// Summary lengths must satisfy `30 <= min_length <= max_length <= 150`.
/// Anything else falls back to the default band.
fn summary_band(min_length: Option<i64>, max_length: Option<i64>) -> GenerationParams {
    let d = GenerationParams::default();
    let min_length = min_length.unwrap_or(d.min_length);
    let max_length = max_length.unwrap_or(d.max_length);

    if d.min_length <= min_length && min_length <= max_length && max_length <= d.max_length {
        GenerationParams {
            min_length,
            max_length,
            do_sample: false,
        }
    } else {
        tracing::warn!(
            min_length,
            max_length,
            "summary lengths outside {}..={}, using defaults",
            d.min_length,
            d.max_length
        );
        d
    }
}

/// Cap a configured keyword count at [`DEFAULT_KEYWORD_COUNT`].
pub fn clamp_keyword_count(count: usize) -> usize {
    if count > DEFAULT_KEYWORD_COUNT {
        tracing::warn!(
            count,
            max = DEFAULT_KEYWORD_COUNT,
            "keyword count above maximum, capping"
        );
    }
    count.min(DEFAULT_KEYWORD_COUNT)
}

impl Settings {
    /// Apply `SYNOPSIS_*` environment overrides. Unparseable values are ignored.
    pub fn apply_env(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("SYNOPSIS_HOST") {
            self.host = host;
        }
        if let Some(port) = var("SYNOPSIS_PORT").and_then(|v| v.parse().ok()) {
            self.port = port;
        }
        if let Some(debug) = var("SYNOPSIS_DEBUG") {
            self.debug = matches!(debug.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(dir) = var("SYNOPSIS_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(model) = var("SYNOPSIS_MODEL") {
            self.model_name = model;
        }
    }
}

/// Platform config directory path: `<config_dir>/synopsis/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("synopsis").join("config.toml"))
}

/// Load config by cascading CWD `.synopsis.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".synopsis.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bs = base.server.unwrap_or_default();
    let os = overlay.server.unwrap_or_default();
    let bm = base.model.unwrap_or_default();
    let om = overlay.model.unwrap_or_default();
    let bk = base.keywords.unwrap_or_default();
    let ok = overlay.keywords.unwrap_or_default();

    ConfigFile {
        server: Some(ServerConfig {
            host: os.host.or(bs.host),
            port: os.port.or(bs.port),
            debug: os.debug.or(bs.debug),
            upload_dir: os.upload_dir.or(bs.upload_dir),
            max_upload_mb: os.max_upload_mb.or(bs.max_upload_mb),
        }),
        model: Some(ModelConfig {
            name: om.name.or(bm.name),
            max_input_tokens: om.max_input_tokens.or(bm.max_input_tokens),
            min_length: om.min_length.or(bm.min_length),
            max_length: om.max_length.or(bm.max_length),
        }),
        keywords: Some(KeywordsConfig {
            count: ok.count.or(bk.count),
        }),
    }
}
