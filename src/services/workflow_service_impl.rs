//! `SeaORM` implementation of the `WorkflowService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::llm::{AnalysisRequest, WorkflowAnalyzer};
use crate::db::Store;
use crate::domain::{Provider, UserId, WorkflowId};
use crate::models::analysis::AnalysisResult;
use crate::models::workflow::{NewWorkflow, Workflow, WorkflowUpdate, normalize_tags};
use crate::services::analysis::{baseline, resolve_title};
use crate::services::credential_service::CredentialStore;
use crate::services::workflow_service::{
    EnrichmentOutcome, IngestReport, IngestRequest, WorkflowError, WorkflowService,
};

pub struct SeaOrmWorkflowService {
    store: Store,
    credentials: Arc<dyn CredentialStore>,
    analyzer: Arc<dyn WorkflowAnalyzer>,
}

impl SeaOrmWorkflowService {
    #[must_use]
    pub fn new(
        store: Store,
        credentials: Arc<dyn CredentialStore>,
        analyzer: Arc<dyn WorkflowAnalyzer>,
    ) -> Self {
        Self {
            store,
            credentials,
            analyzer,
        }
    }

    /// `Ok(None)` when the owner has no key for `provider`; enrichment is then skipped.
    ///
    /// Failure outcomes carry a short message. Technical detail is only logged.
    async fn enrich(
        &self,
        request: &IngestRequest,
        provider: Provider,
        workflow: &Value,
    ) -> Result<Option<AnalysisResult>, EnrichmentOutcome> {
        let owner = request.owner;
        let name = provider.display_name();
        let failed = |message: String, quota_exceeded: bool| EnrichmentOutcome::Failed {
            provider,
            message,
            quota_exceeded,
        };

        let has_key = self.credentials.has(owner, provider).await.map_err(|e| {
            warn!(
                user_id = %owner,
                provider = provider.as_str(),
                error = %e,
                "Key lookup failed"
            );
            failed(format!("The saved {name} key could not be checked"), false)
        })?;
        if !has_key {
            debug!(
                user_id = %owner,
                provider = provider.as_str(),
                "No saved key, skipping enrichment"
            );
            return Ok(None);
        }

        let api_key = self.credentials.reveal(owner, provider).await.map_err(|e| {
            warn!(
                user_id = %owner,
                provider = provider.as_str(),
                error = %e,
                "Saved key unusable"
            );
            failed(format!("The saved {name} key could not be used"), false)
        })?;

        let custom_prompt = self
            .store
            .get_user(owner)
            .await
            .map_err(|e| {
                warn!(user_id = %owner, error = %e, "Failed to load custom prompt");
                failed("Your analysis settings could not be loaded".to_string(), false)
            })?
            .and_then(|u| u.custom_prompt);

        self.analyzer
            .analyze(&AnalysisRequest {
                workflow,
                provider,
                api_key: &api_key,
                language: request.language,
                model_hint: request.model_hint.as_deref(),
                custom_prompt: custom_prompt.as_deref(),
            })
            .await
            .map(Some)
            .map_err(|e| {
                warn!(
                    user_id = %owner,
                    provider = provider.as_str(),
                    error = %e,
                    "Provider analysis failed"
                );
                failed(e.user_message(), e.is_quota())
            })
    }
}

#[async_trait]
impl WorkflowService for SeaOrmWorkflowService {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestReport, WorkflowError> {
        let parsed: Value = serde_json::from_str(&request.raw)
            .map_err(|e| WorkflowError::InvalidWorkflowFormat(e.to_string()))?;

        let base = baseline(&parsed);
        let mut analysis = base.analysis;
        let mut tags = base.tags;

        let enrichment = match request.provider {
            None => EnrichmentOutcome::Skipped,
            Some(provider) => match self.enrich(&request, provider, &parsed).await {
                Ok(None) => EnrichmentOutcome::Skipped,
                Ok(Some(result)) => {
                    tags = normalize_tags(result.hashtags.iter().cloned());
                    analysis = result;
                    EnrichmentOutcome::Succeeded { provider }
                }
                Err(outcome) => {
                    info!(
                        user_id = %request.owner,
                        provider = provider.as_str(),
                        "Enrichment failed, keeping baseline analysis"
                    );
                    outcome
                }
            },
        };

        let new_workflow = NewWorkflow {
            user_id: request.owner,
            title: resolve_title(&parsed, request.file_name.as_deref()),
            description: analysis.summary,
            tags,
            use_cases: analysis.use_cases,
            process_steps: analysis.process_steps,
            technical_features: analysis.technical_features,
            service_names: base.service_names,
            node_count: base.node_count,
            trigger: base.trigger,
            raw_json: request.raw,
        };

        let workflow = self.store.insert_workflow(&new_workflow).await?;

        metrics::counter!("workflows_ingested_total").increment(1);
        info!(
            user_id = %workflow.user_id,
            workflow_id = %workflow.id,
            nodes = workflow.node_count,
            "Workflow ingested"
        );

        Ok(IngestReport {
            workflow,
            enrichment,
        })
    }

    async fn list(&self, owner: UserId) -> Result<Vec<Workflow>, WorkflowError> {
        Ok(self.store.list_workflows(owner).await?)
    }

    async fn get(&self, id: WorkflowId, owner: UserId) -> Result<Workflow, WorkflowError> {
        self.store
            .get_workflow(id, owner)
            .await?
            .ok_or(WorkflowError::NotFound(id))
    }

    async fn update(
        &self,
        id: WorkflowId,
        owner: UserId,
        update: WorkflowUpdate,
    ) -> Result<bool, WorkflowError> {
        if let Some(title) = &update.title
            && title.trim().is_empty()
        {
            return Err(WorkflowError::Validation(
                "Title cannot be empty".to_string(),
            ));
        }

        if update.is_empty() {
            return Ok(self.store.get_workflow(id, owner).await?.is_some());
        }

        Ok(self.store.update_workflow(id, owner, &update).await?)
    }

    async fn delete(&self, id: WorkflowId, owner: UserId) -> Result<bool, WorkflowError> {
        let deleted = self.store.delete_workflow(id, owner).await?;
        if deleted {
            info!(user_id = %owner, workflow_id = %id, "Workflow deleted");
        }
        Ok(deleted)
    }
}
