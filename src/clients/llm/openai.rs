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
    http.post(format!("{}/v1/chat/completions", config.openai_base_url))
        .bearer_auth(api_key)
        .json(&json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": payload },
            ],
        }))
}

pub(super) fn ping_request(http: &Client, config: &AiConfig, api_key: &str) -> RequestBuilder {
    http.post(format!("{}/v1/chat/completions", config.openai_base_url))
        .bearer_auth(api_key)
        .json(&json!({
            "model": config.openai_model,
            "messages": [{ "role": "user", "content": "Hello" }],
            "max_tokens": 5,
        }))
}

pub(super) fn extract_text(body: &Value) -> Option<&str> {
    body.pointer("/choices/0/message/content")?.as_str()
}
