use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use flowhub::clients::llm::{AnalysisRequest, LlmClient, LlmError};
use flowhub::config::AiConfig;
use flowhub::domain::{Language, Provider};
use serde_json::{Value, json};

const ANALYSIS: &str = r##"{"summary":"Routes leads","useCases":["Sales"],"technicalFeatures":["Webhook"],"processSteps":["Receive","Route"],"hashtags":["#crm","#sales"]}"##;

fn fenced() -> String {
    format!("```json\n{ANALYSIS}\n```")
}

async fn openai_chat(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer sk-good");
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        );
    }

    if body["model"] == "gpt-broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})));
    }

    (
        StatusCode::OK,
        Json(json!({"choices": [{"message": {"role": "assistant", "content": fenced()}}]})),
    )
}

async fn anthropic_messages(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) == Some("ant-over-quota") {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"type": "rate_limit_error"}})),
        );
    }
    if headers.get("anthropic-version").is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "missing version"})));
    }

    (
        StatusCode::OK,
        Json(json!({"content": [{"type": "text", "text": fenced()}]})),
    )
}

async fn gemini_generate(
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if query.get("key").map(String::as_str) != Some("gem-good") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"message": "Quota exceeded for quota metric"}})),
        );
    }
    if model != "gemini-1.5-flash:generateContent" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": model})));
    }

    (
        StatusCode::OK,
        Json(json!({"candidates": [{"content": {"parts": [{"text": ANALYSIS}]}}]})),
    )
}

async fn gemini_models(Query(query): Query<HashMap<String, String>>) -> StatusCode {
    if query.get("key").map(String::as_str) == Some("gem-good") {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

/// Serves all three provider APIs on one local port.
async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(openai_chat))
        .route("/v1/messages", post(anthropic_messages))
        .route("/v1beta/models", get(gemini_models))
        .route("/v1beta/models/{model}", post(gemini_generate));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client() -> LlmClient {
    let base = spawn_mock().await;
    let config = AiConfig {
        openai_base_url: base.clone(),
        anthropic_base_url: base.clone(),
        gemini_base_url: base,
        gemini_model: "gemini-1.5-flash".to_string(),
        ..AiConfig::default()
    };
    LlmClient::new(reqwest::Client::new(), config)
}

fn workflow() -> Value {
    json!({"name": "Leads", "nodes": [{"name": "Hook", "type": "n8n-nodes-base.webhook"}]})
}

fn request<'a>(workflow: &'a Value, provider: Provider, api_key: &'a str) -> AnalysisRequest<'a> {
    AnalysisRequest {
        workflow,
        provider,
        api_key,
        language: Language::En,
        model_hint: None,
        custom_prompt: None,
    }
}

#[tokio::test]
async fn test_every_provider_returns_parsed_analysis() {
    let client = client().await;
    let wf = workflow();

    for (provider, key) in [
        (Provider::OpenAi, "sk-good"),
        (Provider::Anthropic, "ant-good"),
        (Provider::Gemini, "gem-good"),
    ] {
        let result = client
            .analyze(&request(&wf, provider, key))
            .await
            .unwrap_or_else(|e| panic!("{provider}: {e}"));
        assert_eq!(result.summary, "Routes leads");
        assert_eq!(result.process_steps, vec!["Receive", "Route"]);
        assert_eq!(result.hashtags, vec!["#crm", "#sales"]);
    }
}

#[tokio::test]
async fn test_rate_limit_is_quota_error() {
    let client = client().await;
    let wf = workflow();

    let err = client
        .analyze(&request(&wf, Provider::Anthropic, "ant-over-quota"))
        .await
        .unwrap_err();
    assert!(err.is_quota());
    assert_eq!(err.provider(), Provider::Anthropic);
}

#[tokio::test]
async fn test_quota_message_in_body_is_quota_error() {
    let client = client().await;
    let wf = workflow();

    let err = client
        .analyze(&request(&wf, Provider::Gemini, "gem-other"))
        .await
        .unwrap_err();
    assert!(err.is_quota());
}

#[tokio::test]
async fn test_server_error_is_provider_error() {
    let client = client().await;
    let wf = workflow();

    let mut req = request(&wf, Provider::OpenAi, "sk-good");
    req.model_hint = Some("gpt-broken");
    let err = client.analyze(&req).await.unwrap_err();
    assert!(matches!(err, LlmError::Provider { status: 500, .. }));
    assert!(!err.is_quota());

    let err = client
        .analyze(&request(&wf, Provider::OpenAi, "sk-bad"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Provider { status: 401, .. }));
}

#[tokio::test]
async fn test_connection_checks() {
    let client = client().await;

    let ok = client.test_connection(Provider::Gemini, "gem-good").await;
    assert!(ok.success);
    assert_eq!(ok.message, "Gemini connected");

    let ok = client.test_connection(Provider::OpenAi, "sk-good").await;
    assert!(ok.success);
    assert_eq!(ok.message, "OpenAI connected");

    let rejected = client.test_connection(Provider::OpenAi, "sk-bad").await;
    assert!(!rejected.success);
    assert!(rejected.message.starts_with("OpenAI error: 401"));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let config = AiConfig {
        openai_base_url: "http://127.0.0.1:9".to_string(),
        ..AiConfig::default()
    };
    let client = LlmClient::new(reqwest::Client::new(), config);
    let wf = workflow();

    let err = client
        .analyze(&request(&wf, Provider::OpenAi, "sk-good"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Transport { .. }));
}
