//! In-memory workflow list for interactive clients.
//!
//! Mutations are applied locally before the backend confirms them:
//! - `add` shows a placeholder with a negative id, swapped for the stored record on
//!   success and removed on failure;
//! - `update` keeps the local edit even when the backend fails;
//! - `delete` restores the previous list when the backend fails.

mod filter;
mod settings;

pub use filter::{SortOrder, WorkflowFilter, filter, popular_tags, sort, tag_count};
pub use settings::ClientSettings;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::domain::{Language, Provider, UserId, WorkflowId};
use crate::models::workflow::{Workflow, WorkflowUpdate};
use crate::services::analysis::{baseline, resolve_title};
use crate::services::{IngestRequest, WorkflowError, WorkflowService};

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Workflow not found: {0}")]
    NotFound(WorkflowId),

    #[error("Workflow {0} is still being saved")]
    Pending(WorkflowId),

    #[error("{0}")]
    Backend(String),
}

impl From<WorkflowError> for CollectionError {
    fn from(err: WorkflowError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// A file picked by the user, not yet stored.
#[derive(Debug, Clone)]
pub struct Upload {
    pub raw: String,
    pub file_name: Option<String>,
    pub provider: Option<Provider>,
    pub language: Language,
    pub model_hint: Option<String>,
}

/// Stored record plus the enrichment warning, if any.
#[derive(Debug, Clone)]
pub struct Created {
    pub workflow: Workflow,
    pub warning: Option<String>,
}

/// Where collection mutations are persisted.
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    async fn create(&self, upload: &Upload) -> Result<Created, CollectionError>;

    async fn update(&self, id: WorkflowId, update: &WorkflowUpdate)
    -> Result<(), CollectionError>;

    async fn delete(&self, id: WorkflowId) -> Result<(), CollectionError>;
}

/// Backend talking to the workflow service in-process on behalf of one user.
pub struct ServiceBackend {
    service: Arc<dyn WorkflowService>,
    owner: UserId,
}

impl ServiceBackend {
    #[must_use]
    pub fn new(service: Arc<dyn WorkflowService>, owner: UserId) -> Self {
        Self { service, owner }
    }
}

#[async_trait]
impl WorkflowBackend for ServiceBackend {
    async fn create(&self, upload: &Upload) -> Result<Created, CollectionError> {
        let report = self
            .service
            .ingest(IngestRequest {
                owner: self.owner,
                raw: upload.raw.clone(),
                file_name: upload.file_name.clone(),
                provider: upload.provider,
                language: upload.language,
                model_hint: upload.model_hint.clone(),
            })
            .await?;

        Ok(Created {
            warning: report.enrichment.warning(),
            workflow: report.workflow,
        })
    }

    async fn update(
        &self,
        id: WorkflowId,
        update: &WorkflowUpdate,
    ) -> Result<(), CollectionError> {
        self.service.update(id, self.owner, update.clone()).await?;
        Ok(())
    }

    async fn delete(&self, id: WorkflowId) -> Result<(), CollectionError> {
        self.service.delete(id, self.owner).await?;
        Ok(())
    }
}

pub struct WorkflowCollection<B> {
    backend: B,
    owner: UserId,
    workflows: Vec<Workflow>,
    next_placeholder: i32,
}

impl<B: WorkflowBackend> WorkflowCollection<B> {
    /// Seeds the collection with the server list as returned (newest first).
    pub const fn new(backend: B, owner: UserId, workflows: Vec<Workflow>) -> Self {
        Self {
            backend,
            owner,
            workflows,
            next_placeholder: -1,
        }
    }

    #[must_use]
    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    #[must_use]
    pub fn get(&self, id: WorkflowId) -> Option<&Workflow> {
        self.workflows.iter().find(|w| w.id == id)
    }

    /// Filtered and ordered copy of the current list.
    #[must_use]
    pub fn view(&self, criteria: &WorkflowFilter, order: SortOrder) -> Vec<Workflow> {
        sort(filter(&self.workflows, criteria), order)
    }

    pub async fn add(&mut self, upload: Upload) -> Result<Created, CollectionError> {
        let placeholder = self.placeholder(&upload);
        let temp_id = placeholder.id;
        self.workflows.insert(0, placeholder);

        match self.backend.create(&upload).await {
            Ok(created) => {
                if let Some(slot) = self.workflows.iter_mut().find(|w| w.id == temp_id) {
                    *slot = created.workflow.clone();
                }
                Ok(created)
            }
            Err(e) => {
                warn!(error = %e, "Failed to save workflow, removing placeholder");
                self.workflows.retain(|w| w.id != temp_id);
                Err(e)
            }
        }
    }

    /// The local edit stays applied even if the backend rejects it.
    pub async fn update(
        &mut self,
        id: WorkflowId,
        update: WorkflowUpdate,
    ) -> Result<(), CollectionError> {
        if id.is_placeholder() {
            return Err(CollectionError::Pending(id));
        }

        let workflow = self
            .workflows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(CollectionError::NotFound(id))?;
        update.apply_to(workflow);

        self.backend.update(id, &update).await.inspect_err(|e| {
            warn!(workflow_id = %id, error = %e, "Failed to update workflow");
        })
    }

    pub async fn delete(&mut self, id: WorkflowId) -> Result<(), CollectionError> {
        if id.is_placeholder() {
            return Err(CollectionError::Pending(id));
        }
        if self.get(id).is_none() {
            return Err(CollectionError::NotFound(id));
        }

        let snapshot = self.workflows.clone();
        self.workflows.retain(|w| w.id != id);

        if let Err(e) = self.backend.delete(id).await {
            warn!(workflow_id = %id, error = %e, "Failed to delete workflow, restoring");
            self.workflows = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Local preview built from the baseline analysis.
    fn placeholder(&mut self, upload: &Upload) -> Workflow {
        let id = WorkflowId::new(self.next_placeholder);
        self.next_placeholder -= 1;

        let parsed: Value = serde_json::from_str(&upload.raw).unwrap_or(Value::Null);
        let base = baseline(&parsed);
        let now = chrono::Utc::now().to_rfc3339();

        Workflow {
            id,
            user_id: self.owner,
            title: resolve_title(&parsed, upload.file_name.as_deref()),
            description: base.analysis.summary,
            tags: base.tags,
            use_cases: base.analysis.use_cases,
            process_steps: base.analysis.process_steps,
            technical_features: base.analysis.technical_features,
            service_names: base.service_names,
            node_count: base.node_count,
            trigger: base.trigger,
            raw_json: upload.raw.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::filter::tests::workflow;
    use super::*;
    use std::sync::Mutex;

    /// Backend that records calls and fails when told to.
    #[derive(Default)]
    struct FakeBackend {
        fail: bool,
        next_id: Mutex<i32>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn check(&self, call: String) -> Result<(), CollectionError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(CollectionError::Backend("backend down".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl WorkflowBackend for FakeBackend {
        async fn create(&self, upload: &Upload) -> Result<Created, CollectionError> {
            self.check("create".into())?;
            let mut next = self.next_id.lock().unwrap();
            *next += 100;
            let mut stored = workflow(*next, "Stored", &["imported"]);
            stored.raw_json.clone_from(&upload.raw);
            Ok(Created {
                workflow: stored,
                warning: None,
            })
        }

        async fn update(
            &self,
            id: WorkflowId,
            _update: &WorkflowUpdate,
        ) -> Result<(), CollectionError> {
            self.check(format!("update {id}"))
        }

        async fn delete(&self, id: WorkflowId) -> Result<(), CollectionError> {
            self.check(format!("delete {id}"))
        }
    }

    fn upload(raw: &str) -> Upload {
        Upload {
            raw: raw.to_string(),
            file_name: Some("flow.json".into()),
            provider: None,
            language: Language::En,
            model_hint: None,
        }
    }

    fn seeded<B: WorkflowBackend>(backend: B) -> WorkflowCollection<B> {
        WorkflowCollection::new(
            backend,
            UserId::new(1),
            vec![workflow(2, "Second", &[]), workflow(1, "First", &[])],
        )
    }

    #[tokio::test]
    async fn add_replaces_placeholder_with_stored_record() {
        let mut collection = seeded(FakeBackend::default());
        let created = collection.add(upload(r#"{"name":"New"}"#)).await.unwrap();

        assert_eq!(created.workflow.id, WorkflowId::new(100));
        assert_eq!(collection.workflows().len(), 3);
        assert_eq!(collection.workflows()[0].id, WorkflowId::new(100));
        assert!(collection.workflows().iter().all(|w| !w.id.is_placeholder()));
    }

    #[tokio::test]
    async fn failed_add_removes_placeholder() {
        let mut collection = seeded(FakeBackend::failing());
        let err = collection.add(upload("{}")).await.unwrap_err();

        assert!(matches!(err, CollectionError::Backend(_)));
        assert_eq!(collection.workflows().len(), 2);
        assert_eq!(collection.workflows()[0].title, "Second");
    }

    #[test]
    fn placeholder_previews_baseline() {
        let mut collection = seeded(FakeBackend::default());
        let preview = collection.placeholder(&upload(
            r#"{"nodes":[{"name":"Start","type":"n8n-nodes-base.manualTrigger"}]}"#,
        ));
        assert!(preview.id.is_placeholder());
        assert_eq!(preview.title, "flow");
        assert_eq!(preview.trigger, "Start");

        let second = collection.placeholder(&upload("not json"));
        assert_eq!(second.id, WorkflowId::new(-2));
        assert_eq!(second.node_count, 0);
    }

    #[tokio::test]
    async fn failed_update_is_kept_locally() {
        let mut collection = seeded(FakeBackend::failing());
        let update = WorkflowUpdate {
            title: Some("Renamed".into()),
            ..Default::default()
        };

        let result = collection.update(WorkflowId::new(1), update).await;
        assert!(result.is_err());
        assert_eq!(collection.get(WorkflowId::new(1)).unwrap().title, "Renamed");
    }

    #[tokio::test]
    async fn update_unknown_id_does_not_call_backend() {
        let backend = FakeBackend::default();
        let mut collection = seeded(backend);
        let err = collection
            .update(WorkflowId::new(42), WorkflowUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CollectionError::NotFound(_)));
        assert!(collection.backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_restores_snapshot() {
        let mut collection = seeded(FakeBackend::failing());
        let before = collection.workflows().to_vec();

        assert!(collection.delete(WorkflowId::new(2)).await.is_err());
        assert_eq!(collection.workflows(), before.as_slice());
    }

    #[tokio::test]
    async fn delete_removes_locally() {
        let mut collection = seeded(FakeBackend::default());
        collection.delete(WorkflowId::new(2)).await.unwrap();
        assert_eq!(collection.workflows().len(), 1);
        assert_eq!(
            collection.backend.calls.lock().unwrap().as_slice(),
            ["delete 2"]
        );
    }

    #[tokio::test]
    async fn placeholders_cannot_be_edited() {
        let mut collection = seeded(FakeBackend::default());
        let err = collection.delete(WorkflowId::new(-1)).await.unwrap_err();
        assert!(matches!(err, CollectionError::Pending(_)));
    }

    #[test]
    fn view_filters_then_sorts() {
        let collection = WorkflowCollection::new(
            FakeBackend::default(),
            UserId::new(1),
            vec![
                workflow(1, "Alpha", &["x"]),
                workflow(2, "Zeta", &["x"]),
                workflow(3, "Mid", &["y"]),
            ],
        );
        let criteria = WorkflowFilter {
            folder_tag: Some("x".into()),
            ..Default::default()
        };
        let view = collection.view(&criteria, SortOrder::TitleDesc);
        let titles: Vec<_> = view.iter().map(|w| w.title.as_str()).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha"]);
    }
}
