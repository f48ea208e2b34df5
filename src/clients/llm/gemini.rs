use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use url::Url;

use crate::config::AiConfig;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini addresses models as `models/<name>`; bare names get the prefix.
#[must_use]
pub fn model_path(model: &str) -> String {
    let model = model.trim().trim_start_matches('/');
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn keyed_url(base: &str, path: &str, api_key: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{base}/v1beta/{path}"))?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

pub(super) fn analysis_request(
    http: &Client,
    config: &AiConfig,
    api_key: &str,
    model: &str,
    system_prompt: &str,
    payload: &str,
) -> Result<RequestBuilder, url::ParseError> {
    let path = format!("{}:generateContent", model_path(model));
    let url = keyed_url(&config.gemini_base_url, &path, api_key)?;

    let safety: Vec<Value> = SAFETY_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": "BLOCK_NONE" }))
        .collect();

    Ok(http.post(url).json(&json!({
        "safetySettings": safety,
        "contents": [{
            "parts": [{
                "text": format!(
                    "SYSTEM INSTRUCTIONS:\n{system_prompt}\n\nUSER DATA TO ANALYZE:\n{payload}"
                ),
            }],
        }],
    })))
}

pub(super) fn ping_request(
    http: &Client,
    config: &AiConfig,
    api_key: &str,
) -> Result<RequestBuilder, url::ParseError> {
    let url = keyed_url(&config.gemini_base_url, "models", api_key)?;
    Ok(http.get(url))
}

pub(super) fn extract_text(body: &Value) -> Option<&str> {
    body.pointer("/candidates/0/content/parts/0/text")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_path_adds_prefix_once() {
        assert_eq!(model_path("gemini-1.5-pro"), "models/gemini-1.5-pro");
        assert_eq!(model_path("models/gemini-1.5-flash"), "models/gemini-1.5-flash");
    }

    #[test]
    fn key_goes_into_query() {
        let url = keyed_url("http://127.0.0.1:9", "models", "k&y").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/v1beta/models?key=k%26y");
    }

    #[test]
    fn extracts_candidate_text() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{}" }] } }]
        });
        assert_eq!(extract_text(&body), Some("{}"));
        assert_eq!(extract_text(&serde_json::json!({})), None);
    }
}
