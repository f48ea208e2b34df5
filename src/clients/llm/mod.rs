//! Client for the three supported LLM providers.
//!
//! Every provider gets the same instructions and the same truncated workflow payload.
//! Each provider module owns its request builder and its reply extractor, and this
//! module handles status classification and JSON post-processing.

mod anthropic;
mod gemini;
mod openai;
pub mod prompt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::domain::{Language, Provider};
use crate::models::analysis::AnalysisResult;

pub use gemini::model_path as gemini_model_path;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{} request failed with status {status}: {message}", .provider.display_name())]
    Provider {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{} quota exceeded, try another provider", .provider.display_name())]
    QuotaExceeded { provider: Provider, message: String },

    #[error("Invalid response from {}: {reason}", .provider.display_name())]
    InvalidResponse { provider: Provider, reason: String },

    #[error("Could not reach {}: {message}", .provider.display_name())]
    Transport { provider: Provider, message: String },
}

impl LlmError {
    #[must_use]
    pub const fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Short text safe to show to the uploader; never contains the provider's reply.
    #[must_use]
    pub fn user_message(&self) -> String {
        let name = self.provider().display_name();
        match self {
            Self::Provider {
                status: 401 | 403, ..
            } => format!("{name} rejected the API key"),
            Self::Provider { .. } => format!("{name} rejected the request"),
            Self::QuotaExceeded { .. } => format!("{name} quota exceeded"),
            Self::InvalidResponse { .. } => format!("{name} returned an unusable analysis"),
            Self::Transport { .. } => format!("{name} could not be reached"),
        }
    }

    #[must_use]
    pub const fn provider(&self) -> Provider {
        match self {
            Self::Provider { provider, .. }
            | Self::QuotaExceeded { provider, .. }
            | Self::InvalidResponse { provider, .. }
            | Self::Transport { provider, .. } => *provider,
        }
    }
}

/// Everything needed for one analysis call. The key is already decrypted.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub workflow: &'a Value,
    pub provider: Provider,
    pub api_key: &'a str,
    pub language: Language,
    pub model_hint: Option<&'a str>,
    pub custom_prompt: Option<&'a str>,
}

/// Result of a key check; failures are reported in `message`, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTest {
    pub success: bool,
    pub message: String,
}

impl ConnectionTest {
    fn ok(provider: Provider) -> Self {
        Self {
            success: true,
            message: format!("{} connected", provider.display_name()),
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Seam used by the ingest pipeline so that tests can stand in for real providers.
#[async_trait]
pub trait WorkflowAnalyzer: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisResult, LlmError>;
}

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    config: AiConfig,
}

impl LlmClient {
    #[must_use]
    pub const fn new(http: Client, config: AiConfig) -> Self {
        Self { http, config }
    }

    /// Model used for `provider`: the hint when given, otherwise the configured one.
    #[must_use]
    pub fn resolve_model(&self, provider: Provider, hint: Option<&str>) -> String {
        let hint = hint.map(str::trim).filter(|h| !h.is_empty());
        match provider {
            Provider::OpenAi => hint.unwrap_or(&self.config.openai_model).to_string(),
            Provider::Anthropic => hint.unwrap_or(&self.config.anthropic_model).to_string(),
            Provider::Gemini => gemini::model_path(hint.unwrap_or(&self.config.gemini_model)),
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisResult, LlmError> {
        let provider = request.provider;
        let model = self.resolve_model(provider, request.model_hint);
        let system_prompt = prompt::system_prompt(request.language, request.custom_prompt);
        let payload = prompt::workflow_payload(request.workflow, self.config.max_payload_chars);

        debug!(
            provider = provider.as_str(),
            model = %model,
            payload_chars = payload.chars().count(),
            "Sending workflow analysis request"
        );

        let builder = self.analysis_request(
            provider,
            request.api_key,
            &model,
            &system_prompt,
            &payload,
        )?;
        let response = send(provider, builder).await?;
        let body = read_success_body(provider, response).await?;

        let text = match provider {
            Provider::OpenAi => openai::extract_text(&body),
            Provider::Anthropic => anthropic::extract_text(&body),
            Provider::Gemini => gemini::extract_text(&body),
        }
        .ok_or_else(|| LlmError::InvalidResponse {
            provider,
            reason: "reply did not contain any text content".to_string(),
        })?;

        let result = parse_analysis(provider, text)?;
        metrics::counter!("llm_analyses_total", "provider" => provider.as_str()).increment(1);
        Ok(result)
    }

    /// Checks a key without storing it.
    pub async fn test_connection(&self, provider: Provider, api_key: &str) -> ConnectionTest {
        let builder = match provider {
            Provider::OpenAi => Ok(openai::ping_request(&self.http, &self.config, api_key)),
            Provider::Anthropic => Ok(anthropic::ping_request(&self.http, &self.config, api_key)),
            Provider::Gemini => gemini::ping_request(&self.http, &self.config, api_key),
        };

        let builder = match builder {
            Ok(builder) => builder,
            Err(e) => return ConnectionTest::failed(format!("Invalid Gemini URL: {e}")),
        };

        match builder.send().await {
            Ok(response) if response.status().is_success() => ConnectionTest::ok(provider),
            Ok(response) => {
                let status = response.status();
                warn!(provider = provider.as_str(), %status, "Connection test rejected");
                ConnectionTest::failed(format!("{} error: {status}", provider.display_name()))
            }
            Err(e) => {
                warn!(provider = provider.as_str(), error = %e, "Connection test failed");
                ConnectionTest::failed(format!("Could not reach {}", provider.display_name()))
            }
        }
    }

    fn analysis_request(
        &self,
        provider: Provider,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        payload: &str,
    ) -> Result<RequestBuilder, LlmError> {
        match provider {
            Provider::OpenAi => Ok(openai::analysis_request(
                &self.http,
                &self.config,
                api_key,
                model,
                system_prompt,
                payload,
            )),
            Provider::Anthropic => Ok(anthropic::analysis_request(
                &self.http,
                &self.config,
                api_key,
                model,
                system_prompt,
                payload,
            )),
            Provider::Gemini => gemini::analysis_request(
                &self.http,
                &self.config,
                api_key,
                model,
                system_prompt,
                payload,
            )
            .map_err(|e| LlmError::Transport {
                provider,
                message: format!("invalid endpoint: {e}"),
            }),
        }
    }
}

#[async_trait]
impl WorkflowAnalyzer for LlmClient {
    async fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisResult, LlmError> {
        Self::analyze(self, request).await
    }
}

async fn send(provider: Provider, builder: RequestBuilder) -> Result<Response, LlmError> {
    builder.send().await.map_err(|e| LlmError::Transport {
        provider,
        message: e.to_string(),
    })
}

async fn read_success_body(provider: Provider, response: Response) -> Result<Value, LlmError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_failure(provider, status.as_u16(), body));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| LlmError::InvalidResponse {
            provider,
            reason: format!("body is not JSON: {e}"),
        })
}

/// 429 or a body mentioning an exceeded quota is a quota error; anything else is a
/// plain provider error.
#[must_use]
pub fn classify_failure(provider: Provider, status: u16, body: String) -> LlmError {
    if status == 429 || body.to_ascii_lowercase().contains("quota exceeded") {
        LlmError::QuotaExceeded {
            provider,
            message: body,
        }
    } else {
        LlmError::Provider {
            provider,
            status,
            message: body,
        }
    }
}

/// Strips fences and parses the strict result object.
pub fn parse_analysis(provider: Provider, content: &str) -> Result<AnalysisResult, LlmError> {
    let cleaned = prompt::strip_code_fences(content);
    serde_json::from_str(&cleaned).map_err(|e| LlmError::InvalidResponse {
        provider,
        reason: format!("reply is not the expected JSON object: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LlmClient {
        LlmClient::new(Client::new(), AiConfig::default())
    }

    #[test]
    fn quota_classification() {
        assert!(classify_failure(Provider::Gemini, 429, String::new()).is_quota());
        assert!(
            classify_failure(Provider::Gemini, 403, "Quota exceeded for metric".into()).is_quota()
        );
        let err = classify_failure(Provider::OpenAi, 401, "bad key".into());
        assert!(!err.is_quota());
        assert!(matches!(err, LlmError::Provider { status: 401, .. }));
        assert_eq!(err.provider(), Provider::OpenAi);
    }

    #[test]
    fn user_message_hides_provider_reply() {
        let body = r#"{"error":{"message":"Incorrect API key provided: sk-abc***xyz"}}"#;

        let rejected = classify_failure(Provider::OpenAi, 401, body.to_string());
        assert_eq!(rejected.user_message(), "OpenAI rejected the API key");

        let failed = classify_failure(Provider::Anthropic, 500, body.to_string());
        assert_eq!(failed.user_message(), "Anthropic rejected the request");

        let quota = classify_failure(Provider::Gemini, 429, body.to_string());
        assert_eq!(quota.user_message(), "Gemini quota exceeded");

        let unreachable = LlmError::Transport {
            provider: Provider::OpenAi,
            message: "dns error: sk-abc".to_string(),
        };
        assert_eq!(unreachable.user_message(), "OpenAI could not be reached");

        for err in [rejected, failed, quota, unreachable] {
            assert!(!err.user_message().contains("sk-abc"));
        }
    }

    #[test]
    fn parse_fenced_reply() {
        let reply = "```json\n{\"summary\":\"s\",\"useCases\":[],\"technicalFeatures\":[],\"processSteps\":[\"a\"],\"hashtags\":[\"#x\"]}\n```";
        let result = parse_analysis(Provider::Anthropic, reply).unwrap();
        assert_eq!(result.summary, "s");
        assert_eq!(result.process_steps, vec!["a"]);
    }

    #[test]
    fn parse_rejects_prose() {
        let err = parse_analysis(Provider::OpenAi, "Sure! Here is your analysis.").unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse { .. }));
    }

    #[test]
    fn model_resolution() {
        let client = client();
        assert_eq!(client.resolve_model(Provider::OpenAi, None), "gpt-4o");
        assert_eq!(
            client.resolve_model(Provider::OpenAi, Some("gpt-4o-mini")),
            "gpt-4o-mini"
        );
        assert_eq!(
            client.resolve_model(Provider::Gemini, None),
            "models/gemini-1.5-flash"
        );
        assert_eq!(
            client.resolve_model(Provider::Gemini, Some("gemini-1.5-pro")),
            "models/gemini-1.5-pro"
        );
        assert_eq!(
            client.resolve_model(Provider::Anthropic, Some("  ")),
            "claude-3-5-sonnet-20240620"
        );
    }

    #[test]
    fn extractors_follow_provider_shapes() {
        let openai = serde_json::json!({"choices": [{"message": {"content": "o"}}]});
        let anthropic = serde_json::json!({"content": [{"type": "text", "text": "a"}]});
        assert_eq!(openai::extract_text(&openai), Some("o"));
        assert_eq!(anthropic::extract_text(&anthropic), Some("a"));
        assert_eq!(openai::extract_text(&anthropic), None);
    }
}
