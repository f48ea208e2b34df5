//! Prompt construction and reply post-processing shared by every provider.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::domain::Language;

/// Custom prompts at or below this trimmed length are ignored.
pub const MIN_CUSTOM_PROMPT_CHARS: usize = 10;

const RESULT_SHAPE: &str = r#"{
    "summary": "string",
    "useCases": ["string"],
    "technicalFeatures": ["string"],
    "processSteps": ["string"],
    "hashtags": ["string"]
}"#;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("valid fence regex"));

/// Builds the instruction text sent ahead of the workflow payload.
///
/// A custom prompt replaces the default when its trimmed length exceeds
/// [`MIN_CUSTOM_PROMPT_CHARS`]; the JSON shape requirement is always appended to it.
#[must_use]
pub fn system_prompt(language: Language, custom: Option<&str>) -> String {
    if let Some(custom) = custom.filter(|c| c.trim().chars().count() > MIN_CUSTOM_PROMPT_CHARS) {
        return format!(
            "{custom}\n\nIMPORTANT: Respond with a single valid JSON object with exactly this structure:\n{RESULT_SHAPE}\nDo not wrap the answer in markdown code blocks. Return raw JSON only."
        );
    }

    let lang = language.name();
    format!(
        "You are an expert automation workflow architect and analyst.\n\
Analyze the n8n workflow JSON provided below in depth.\n\
\n\
RULES:\n\
1. Write every value STRICTLY in {lang}. Do not use any other language.\n\
2. IGNORE any existing 'description' or 'message' fields in the JSON. Do not copy them; write the analysis from scratch.\n\
3. Be technical but clear.\n\
\n\
Return ONLY a JSON object with this exact structure:\n\
{RESULT_SHAPE}\n\
\n\
Requirements:\n\
- \"summary\": one detailed paragraph (about 100 words) explaining the full flow from trigger through processing to outcome.\n\
- \"processSteps\": 5 to 10 steps, each describing the data transformation that happens.\n\
- \"technicalFeatures\": 4 to 6 specific nodes or patterns used.\n\
- \"useCases\": 3 real-world business scenarios.\n\
- \"hashtags\": at least 6 relevant technical hashtags.\n\
\n\
Do not wrap the answer in markdown code blocks."
    )
}

/// Compact JSON of the workflow, cut to at most `max_chars` characters.
#[must_use]
pub fn workflow_payload(workflow: &Value, max_chars: usize) -> String {
    let compact = workflow.to_string();
    if compact.chars().count() <= max_chars {
        compact
    } else {
        compact.chars().take(max_chars).collect()
    }
}

/// Removes markdown code fences and surrounding whitespace from a model reply.
#[must_use]
pub fn strip_code_fences(content: &str) -> String {
    CODE_FENCE.replace_all(content, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_prompt_names_language() {
        let prompt = system_prompt(Language::Tr, None);
        assert!(prompt.contains("STRICTLY in Turkish"));
        assert!(prompt.contains("\"technicalFeatures\""));

        let prompt = system_prompt(Language::En, Some("   short   "));
        assert!(prompt.contains("STRICTLY in English"));
    }

    #[test]
    fn custom_prompt_gets_shape_suffix() {
        let custom = "Summarize this for a sales audience please";
        let prompt = system_prompt(Language::En, Some(custom));
        assert!(prompt.starts_with(custom));
        assert!(prompt.contains("\"hashtags\""));
        assert!(!prompt.contains("expert automation workflow architect"));
    }

    #[test]
    fn custom_prompt_length_boundary() {
        // exactly ten characters after trimming is not enough
        let prompt = system_prompt(Language::En, Some("  0123456789  "));
        assert!(prompt.contains("expert automation workflow architect"));

        let prompt = system_prompt(Language::En, Some("01234567890"));
        assert!(prompt.starts_with("01234567890"));
    }

    #[test]
    fn payload_is_compact_and_truncated() {
        let workflow = json!({"name": "A", "nodes": []});
        assert_eq!(workflow_payload(&workflow, 100), r#"{"name":"A","nodes":[]}"#);
        assert_eq!(workflow_payload(&workflow, 5), r#"{"nam"#);
    }

    #[test]
    fn payload_truncation_counts_characters() {
        let workflow = json!({"name": "çğüşöı"});
        let payload = workflow_payload(&workflow, 12);
        assert_eq!(payload.chars().count(), 12);
        assert!(payload.ends_with("çğü"));
    }

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("{\"plain\":true}"), "{\"plain\":true}");
    }
}
