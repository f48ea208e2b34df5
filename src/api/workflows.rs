use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_title, validate_upload_content, validate_workflow_id};
use super::{
    ApiError, ApiResponse, AppState, DeletedResponse, UpdatedResponse, UploadWorkflowRequest,
    UploadWorkflowResponse,
};
use crate::domain::Language;
use crate::models::workflow::{Workflow, WorkflowUpdate};
use crate::services::{IngestRequest, WorkflowError};

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidWorkflowFormat(msg) => {
                Self::validation(format!("Invalid workflow file: {msg}"))
            }
            WorkflowError::NotFound(id) => Self::not_found("Workflow", id),
            WorkflowError::Validation(msg) => Self::validation(msg),
            WorkflowError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// GET /workflows
pub async fn list_workflows(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<Workflow>>>, ApiError> {
    let workflows = state.workflow_service().list(user).await?;
    Ok(Json(ApiResponse::success(workflows)))
}

/// POST /workflows
/// Stores an upload; enrichment problems come back as a warning, not an error
pub async fn upload_workflow(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UploadWorkflowRequest>,
) -> Result<Json<ApiResponse<UploadWorkflowResponse>>, ApiError> {
    validate_upload_content(&payload.content)?;

    let request = IngestRequest {
        owner: user,
        raw: payload.content,
        file_name: payload.file_name,
        provider: payload.provider,
        language: payload
            .language
            .as_deref()
            .map(Language::from_code)
            .unwrap_or_default(),
        model_hint: payload.model,
    };

    let report = state.workflow_service().ingest(request).await?;
    Ok(Json(ApiResponse::success(report.into())))
}

/// GET /workflows/{id}
pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Workflow>>, ApiError> {
    let id = validate_workflow_id(id)?;
    let workflow = state.workflow_service().get(id, user).await?;
    Ok(Json(ApiResponse::success(workflow)))
}

/// PATCH /workflows/{id}
/// Another user's id is a no-op that reports `updated: false`
pub async fn update_workflow(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(mut update): Json<WorkflowUpdate>,
) -> Result<Json<ApiResponse<UpdatedResponse>>, ApiError> {
    let id = validate_workflow_id(id)?;
    if let Some(title) = &update.title {
        update.title = Some(validate_title(title)?.to_string());
    }

    let updated = state.workflow_service().update(id, user, update).await?;
    Ok(Json(ApiResponse::success(UpdatedResponse { updated })))
}

/// DELETE /workflows/{id}
pub async fn delete_workflow(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let id = validate_workflow_id(id)?;
    let deleted = state.workflow_service().delete(id, user).await?;
    Ok(Json(ApiResponse::success(DeletedResponse { deleted })))
}
