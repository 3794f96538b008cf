use std::str::FromStr;
use std::sync::Mutex;

use rust_bert::bart::{
    BartConfigResources, BartMergesResources, BartModelResources, BartVocabResources,
};
use rust_bert::pipelines::common::{ModelResource, ModelType};
use rust_bert::pipelines::summarization::{SummarizationConfig, SummarizationModel};
use rust_bert::resources::RemoteResource;
use rust_bert::t5::{T5ConfigResources, T5ModelResources, T5VocabResources};

use synopsis_core::{BackendError, GenerationParams, SummaryBackend};

/// Pretrained models this backend knows how to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    T5Small,
    T5Base,
    BartLargeCnn,
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::T5Small => "t5-small",
            ModelKind::T5Base => "t5-base",
            ModelKind::BartLargeCnn => "bart-large-cnn",
        }
    }

    fn config(&self) -> SummarizationConfig {
        match self {
            ModelKind::T5Small => SummarizationConfig::new(
                ModelType::T5,
                ModelResource::Torch(Box::new(RemoteResource::from_pretrained(
                    T5ModelResources::T5_SMALL,
                ))),
                RemoteResource::from_pretrained(T5ConfigResources::T5_SMALL),
                RemoteResource::from_pretrained(T5VocabResources::T5_SMALL),
                None,
            ),
            ModelKind::T5Base => SummarizationConfig::new(
                ModelType::T5,
                ModelResource::Torch(Box::new(RemoteResource::from_pretrained(
                    T5ModelResources::T5_BASE,
                ))),
                RemoteResource::from_pretrained(T5ConfigResources::T5_BASE),
                RemoteResource::from_pretrained(T5VocabResources::T5_BASE),
                None,
            ),
            ModelKind::BartLargeCnn => SummarizationConfig::new(
                ModelType::Bart,
                ModelResource::Torch(Box::new(RemoteResource::from_pretrained(
                    BartModelResources::BART_CNN,
                ))),
                RemoteResource::from_pretrained(BartConfigResources::BART_CNN),
                RemoteResource::from_pretrained(BartVocabResources::BART_CNN),
                Some(RemoteResource::from_pretrained(BartMergesResources::BART_CNN)),
            ),
        }
    }
}

impl FromStr for ModelKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "t5-small" => Ok(ModelKind::T5Small),
            "t5-base" => Ok(ModelKind::T5Base),
            "bart-large-cnn" | "bart-cnn" => Ok(ModelKind::BartLargeCnn),
            other => Err(BackendError::ModelLoad(format!(
                "unknown model '{other}' (expected t5-small, t5-base or bart-large-cnn)"
            ))),
        }
    }
}

/// rust-bert implementation of [`SummaryBackend`].
///
/// libtorch-backed models are not `Sync`, so inference is serialized
/// through a mutex: concurrent requests queue for the model.
pub struct RustBertSummarizer {
    kind: ModelKind,
    model: Mutex<SummarizationModel>,
}

impl RustBertSummarizer {
    /// Download (or reuse cached) weights and build the model.
    ///
    /// Blocking and slow; call it once at startup on a blocking thread.
    pub fn load(kind: ModelKind, params: GenerationParams) -> Result<Self, BackendError> {
        let config = summarization_config(kind, params);

        tracing::info!(model = kind.name(), "loading summarization model");
        let model =
            SummarizationModel::new(config).map_err(|e| BackendError::ModelLoad(e.to_string()))?;

        Ok(Self {
            kind,
            model: Mutex::new(model),
        })
    }

    /// Parse `name` and load it.
    pub fn load_named(name: &str, params: GenerationParams) -> Result<Self, BackendError> {
        Self::load(name.parse()?, params)
    }
}

/// Resources of `kind` with the summary length band and decoding mode of
/// `params` applied.
fn summarization_config(kind: ModelKind, params: GenerationParams) -> SummarizationConfig {
    SummarizationConfig {
        min_length: params.min_length,
        max_length: Some(params.max_length),
        do_sample: params.do_sample,
        ..kind.config()
    }
}

impl SummaryBackend for RustBertSummarizer {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn summarize(&self, text: &str) -> Result<String, BackendError> {
        let model = self
            .model
            .lock()
            .map_err(|_| BackendError::Inference("model lock poisoned".into()))?;
        let mut output = model
            .summarize(&[text])
            .map_err(|e| BackendError::Inference(e.to_string()))?;
        if output.is_empty() {
            return Err(BackendError::Inference("model returned no output".into()));
        }
        Ok(output.swap_remove(0))
    }
}
