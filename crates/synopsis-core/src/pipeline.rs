use std::borrow::Cow;
use std::sync::Arc;

use crate::backend::{BackendError, SummaryBackend};
use crate::keywords::{DEFAULT_KEYWORD_COUNT, TfidfRanker};
use crate::{Analysis, PipelineError};

/// Whitespace-token ceiling applied before the model sees the input.
pub const DEFAULT_MAX_INPUT_TOKENS: usize = 512;

/// Tunables of a [`Pipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub max_input_tokens: usize,
    pub keyword_count: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
            keyword_count: DEFAULT_KEYWORD_COUNT,
        }
    }
}

enum ModelState {
    Ready(Arc<dyn SummaryBackend>),
    Unavailable(String),
}

/// Summarization and keyword extraction over a model loaded once at startup.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct Pipeline {
    model: ModelState,
    ranker: TfidfRanker,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn SummaryBackend>, settings: PipelineSettings) -> Self {
        Self {
            model: ModelState::Ready(backend),
            ranker: ranker_for(&settings),
            settings,
        }
    }

    /// A pipeline whose model failed to load. `summarize` always fails with
    /// [`PipelineError::ModelUnavailable`]; keywords still work.
    pub fn unavailable(reason: impl Into<String>, settings: PipelineSettings) -> Self {
        Self {
            model: ModelState::Unavailable(reason.into()),
            ranker: ranker_for(&settings),
            settings,
        }
    }

    /// Build from the outcome of the single model load attempt.
    pub fn from_load<B>(loaded: Result<B, BackendError>, settings: PipelineSettings) -> Self
    where
        B: SummaryBackend + 'static,
    {
        match loaded {
            Ok(backend) => {
                tracing::info!(model = backend.name(), "summarization model loaded");
                Self::new(Arc::new(backend), settings)
            }
            Err(e) => {
                tracing::warn!(error = %e, "summarization model unavailable, running degraded");
                Self::unavailable(e.to_string(), settings)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.model, ModelState::Ready(_))
    }

    /// Name of the loaded model, if any.
    pub fn model_name(&self) -> Option<&str> {
        match &self.model {
            ModelState::Ready(backend) => Some(backend.name()),
            ModelState::Unavailable(_) => None,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Summarize `text`, keeping only its first `max_input_tokens` tokens.
    pub fn summarize(&self, text: &str) -> Result<String, PipelineError> {
        let backend = match &self.model {
            ModelState::Ready(backend) => backend,
            ModelState::Unavailable(reason) => {
                return Err(PipelineError::ModelUnavailable(reason.clone()));
            }
        };

        let bounded = truncate_tokens(text, self.settings.max_input_tokens);
        if let Cow::Owned(_) = bounded {
            tracing::debug!(
                limit = self.settings.max_input_tokens,
                "input truncated before summarization"
            );
        }

        let summary = backend.summarize(&bounded).map_err(|e| {
            tracing::warn!(model = backend.name(), error = %e, "summarization failed");
            PipelineError::Inference(e.to_string())
        })?;

        if summary.trim().is_empty() {
            return Err(PipelineError::Inference(
                "model returned an empty summary".to_string(),
            ));
        }
        Ok(summary)
    }

    /// Best-effort keywords; never fails.
    ///
    /// The top terms by score are returned in alphabetical order.
    pub fn keywords(&self, text: &str) -> Vec<String> {
        match self.ranker.rank_text(text) {
            Ok(ranked) => {
                let mut terms: Vec<String> = ranked.into_iter().map(|t| t.term).collect();
                terms.sort();
                terms
            }
            Err(e) => {
                tracing::debug!(error = %e, "keyword extraction failed");
                Vec::new()
            }
        }
    }

    /// Validate `text`, then summarize it and extract its keywords.
    pub fn analyze(&self, text: &str) -> Result<Analysis, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::Validation("No text provided".to_string()));
        }
        let summary = self.summarize(text)?;
        let keywords = self.keywords(text);
        Ok(Analysis { summary, keywords })
    }
}

fn ranker_for(settings: &PipelineSettings) -> TfidfRanker {
    TfidfRanker::new(settings.keyword_count.min(DEFAULT_KEYWORD_COUNT))
}

/// Keep the first `max_tokens` whitespace-separated tokens of `text`.
///
/// Text within the limit is returned untouched; longer text is rejoined with
/// single spaces. Everything after the limit is dropped.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> Cow<'_, str> {
    if text.split_whitespace().nth(max_tokens).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.split_whitespace()
            .take(max_tokens)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records its input and echoes a fixed summary.
    struct RecordingBackend {
        seen: Mutex<Vec<String>>,
        reply: String,
    }

    impl RecordingBackend {
        fn replying(reply: &str) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }
    }

    impl SummaryBackend for RecordingBackend {
        fn name(&self) -> &str {
            "recording"
        }

        fn summarize(&self, text: &str) -> Result<String, BackendError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FailingBackend;

    impl SummaryBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        fn summarize(&self, _text: &str) -> Result<String, BackendError> {
            Err(BackendError::Inference("tensor shape mismatch".into()))
        }
    }

    #[test]
    fn truncate_keeps_short_text_verbatim() {
        let text = "  two\ttokens  ";
        assert!(matches!(truncate_tokens(text, 2), Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn truncate_drops_tail() {
        assert_eq!(truncate_tokens("a b\nc  d e", 3), "a b c");
    }

    #[test]
    fn summarize_sees_only_first_512_tokens() {
        let backend = Arc::new(RecordingBackend::replying("a summary"));
        let pipeline = Pipeline::new(backend.clone(), PipelineSettings::default());

        let mut words: Vec<String> = (0..512).map(|i| format!("w{i}")).collect();
        words.push("ZEBRAMARKER".to_string());
        let text = words.join(" ");

        pipeline.summarize(&text).unwrap();
        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].split_whitespace().count(), 512);
        assert!(!seen[0].contains("ZEBRAMARKER"));
    }

    #[test]
    fn unavailable_model_reports_model_unavailable() {
        let pipeline = Pipeline::unavailable("no weights", PipelineSettings::default());
        assert!(!pipeline.is_ready());
        assert!(matches!(
            pipeline.summarize("some text"),
            Err(PipelineError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn backend_fault_is_inference_error() {
        let pipeline = Pipeline::new(Arc::new(FailingBackend), PipelineSettings::default());
        let err = pipeline.summarize("some text").unwrap_err();
        assert!(matches!(err, PipelineError::Inference(ref m) if m.contains("tensor")));
    }

    #[test]
    fn empty_model_output_is_not_success() {
        let pipeline = Pipeline::new(
            Arc::new(RecordingBackend::replying("   ")),
            PipelineSettings::default(),
        );
        assert!(matches!(
            pipeline.summarize("some text"),
            Err(PipelineError::Inference(_))
        ));
    }

    #[test]
    fn keywords_degrade_to_empty() {
        let pipeline = Pipeline::unavailable("unused", PipelineSettings::default());
        assert!(pipeline.keywords("the of and").is_empty());
        assert!(pipeline.keywords("").is_empty());
    }

    #[test]
    fn keywords_are_top_terms_in_alphabetical_order() {
        let pipeline = Pipeline::unavailable("unused", PipelineSettings::default());
        assert_eq!(
            pipeline.keywords("rust compiler rust borrow checker rust compiler"),
            vec!["borrow", "checker", "compiler", "rust"]
        );
    }

    #[test]
    fn keywords_select_by_score_before_sorting() {
        let pipeline = Pipeline::unavailable("unused", PipelineSettings::default());
        // "zeta" is the most frequent term, "alpha" is dropped by the limit.
        let text = "zeta zeta zeta yak yak xray xray wolf wolf vole vole alpha";
        assert_eq!(
            pipeline.keywords(text),
            vec!["vole", "wolf", "xray", "yak", "zeta"]
        );
    }

    #[test]
    fn keyword_count_never_exceeds_five() {
        let settings = PipelineSettings {
            keyword_count: 10,
            ..PipelineSettings::default()
        };
        let pipeline = Pipeline::unavailable("unused", settings);
        let text = "alpha beta gamma delta epsilon zeta theta iota kappa lambda";
        assert_eq!(pipeline.keywords(text).len(), 5);
    }

    #[test]
    fn analyze_rejects_blank_text() {
        let pipeline = Pipeline::new(
            Arc::new(RecordingBackend::replying("s")),
            PipelineSettings::default(),
        );
        assert!(matches!(
            pipeline.analyze(" \n "),
            Err(PipelineError::Validation(_))
        ));
    }

    #[test]
    fn analyze_returns_summary_and_keywords() {
        let pipeline = Pipeline::new(
            Arc::new(RecordingBackend::replying("A fox jumps.")),
            PipelineSettings::default(),
        );
        let analysis = pipeline
            .analyze("The quick brown fox jumps over the lazy dog.")
            .unwrap();
        assert_eq!(analysis.summary, "A fox jumps.");
        let allowed = ["quick", "brown", "fox", "jumps", "lazy", "dog"];
        assert!(analysis.keywords.len() <= 5);
        assert!(analysis.keywords.iter().all(|k| allowed.contains(&k.as_str())));
    }

    #[test]
    fn from_load_failure_is_degraded() {
        let pipeline = Pipeline::from_load::<FailingBackend>(
            Err(BackendError::ModelLoad("missing libtorch".into())),
            PipelineSettings::default(),
        );
        assert!(!pipeline.is_ready());
        assert_eq!(pipeline.model_name(), None);
    }
}
