use serde::{Deserialize, Serialize};
use synopsis_core::Analysis;

// ── Request DTOs ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: Option<String>,
}

// ── Response DTOs ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisJson {
    pub summary: String,
    pub keywords: Vec<String>,
}

impl From<Analysis> for AnalysisJson {
    fn from(a: Analysis) -> Self {
        AnalysisJson {
            summary: a.summary,
            keywords: a.keywords,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthJson {
    pub status: &'static str,
    pub model_loaded: bool,
    pub model: Option<String>,
}
