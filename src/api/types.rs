use serde::{Deserialize, Serialize};

use crate::domain::Provider;
use crate::models::workflow::Workflow;
use crate::services::{EnrichmentOutcome, IngestReport, KeyStatus};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `POST /workflows`. `content` is the document text as the user picked it.
#[derive(Debug, Deserialize)]
pub struct UploadWorkflowRequest {
    pub content: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadWorkflowResponse {
    pub workflow: Workflow,
    pub enrichment: EnrichmentOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<IngestReport> for UploadWorkflowResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            warning: report.enrichment.warning(),
            workflow: report.workflow,
            enrichment: report.enrichment,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub custom_prompt: Option<String>,
    pub keys: KeyStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveKeyRequest {
    pub key: String,
}

/// Body of the key test route. Without `key` the stored key is tested.
#[derive(Debug, Default, Deserialize)]
pub struct TestKeyRequest {
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
    pub version: &'static str,
}
