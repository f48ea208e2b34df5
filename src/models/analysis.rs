use serde::{Deserialize, Serialize};

/// Structured analysis of a workflow, produced either by a provider or by the
/// deterministic fallback. Field names follow the JSON object the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub use_cases: Vec<String>,
    pub technical_features: Vec<String>,
    pub process_steps: Vec<String>,
    pub hashtags: Vec<String>,
}
