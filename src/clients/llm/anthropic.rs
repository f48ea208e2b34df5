use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};

use crate::config::AiConfig;

pub(super) fn analysis_request(
    http: &Client,
    config: &AiConfig,
    api_key: &str,
    model: &str,
    system_prompt: &str,
    payload: &str,
) -> RequestBuilder {
    http.post(format!("{}/v1/messages", config.anthropic_base_url))
        .header("x-api-key", api_key)
        .header("anthropic-version", &config.anthropic_version)
        .json(&json!({
            "model": model,
            "max_tokens": config.anthropic_max_tokens,
            "messages": [{
                "role": "user",
                "content": format!("{system_prompt}\n\nTasks:\n{payload}"),
            }],
        }))
}

pub(super) fn ping_request(http: &Client, config: &AiConfig, api_key: &str) -> RequestBuilder {
    http.post(format!("{}/v1/messages", config.anthropic_base_url))
        .header("x-api-key", api_key)
        .header("anthropic-version", &config.anthropic_version)
        .json(&json!({
            "model": config.anthropic_model,
            "max_tokens": 5,
            "messages": [{ "role": "user", "content": "Hello" }],
        }))
}

pub(super) fn extract_text(body: &Value) -> Option<&str> {
    body.pointer("/content/0/text")?.as_str()
}
