//! Domain service for workflow ingestion and owner-scoped workflow management.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Language, Provider, UserId, WorkflowId};
use crate::models::workflow::{Workflow, WorkflowUpdate};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid workflow format: {0}")]
    InvalidWorkflowFormat(String),

    /// Missing or owned by someone else; the two are indistinguishable on purpose.
    #[error("Workflow not found: {0}")]
    NotFound(WorkflowId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for WorkflowError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for WorkflowError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// One upload as received from a client.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub owner: UserId,
    /// Document text exactly as uploaded.
    pub raw: String,
    pub file_name: Option<String>,
    /// Provider to enrich with; `None` keeps the baseline analysis.
    pub provider: Option<Provider>,
    pub language: Language,
    pub model_hint: Option<String>,
}

/// What happened to the optional enrichment step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    Skipped,
    Succeeded {
        provider: Provider,
    },
    Failed {
        provider: Provider,
        message: String,
        quota_exceeded: bool,
    },
}

impl EnrichmentOutcome {
    /// Short notice for the uploader when the fallback analysis was used.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Failed {
                provider,
                quota_exceeded: true,
                ..
            } => Some(format!(
                "{} quota exceeded; basic analysis was used instead. Try another provider.",
                provider.display_name()
            )),
            Self::Failed { message, .. } => Some(format!(
                "AI analysis failed ({message}); basic analysis was used instead."
            )),
            Self::Skipped | Self::Succeeded { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub workflow: Workflow,
    pub enrichment: EnrichmentOutcome,
}

#[async_trait::async_trait]
pub trait WorkflowService: Send + Sync {
    /// Parses, analyzes and persists an upload.
    ///
    /// Enrichment failures never fail the upload; they are reported in
    /// [`IngestReport::enrichment`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::InvalidWorkflowFormat`] when the text is not JSON,
    /// in which case nothing is stored.
    async fn ingest(&self, request: IngestRequest) -> Result<IngestReport, WorkflowError>;

    /// Owner's workflows, newest first.
    async fn list(&self, owner: UserId) -> Result<Vec<Workflow>, WorkflowError>;

    async fn get(&self, id: WorkflowId, owner: UserId) -> Result<Workflow, WorkflowError>;

    /// Applies the present fields. Returns `false` when nothing matched `(id, owner)`.
    async fn update(
        &self,
        id: WorkflowId,
        owner: UserId,
        update: WorkflowUpdate,
    ) -> Result<bool, WorkflowError>;

    /// Returns `false` when nothing matched `(id, owner)`.
    async fn delete(&self, id: WorkflowId, owner: UserId) -> Result<bool, WorkflowError>;
}
