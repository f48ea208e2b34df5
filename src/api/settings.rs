use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_prompt, validate_provider};
use super::{
    ApiError, ApiResponse, AppState, MessageResponse, SaveKeyRequest, SettingsResponse,
    TestKeyRequest, UpdatePromptRequest,
};
use crate::clients::llm::ConnectionTest;
use crate::services::{CredentialError, KeyStatus};

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            err @ CredentialError::NotFound(_) => Self::NotFound(err.to_string()),
            err @ CredentialError::Decryption { .. } => {
                tracing::error!(error = %err, "Stored key unusable");
                Self::Conflict(format!("{err}; save the key again"))
            }
            CredentialError::Validation(msg) => Self::validation(msg),
            CredentialError::Database(msg) => Self::DatabaseError(msg),
            CredentialError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /settings
/// Custom prompt plus which providers have a key; key values are never returned
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<SettingsResponse>>, ApiError> {
    let custom_prompt = state.auth_service().get_custom_prompt(user).await?;
    let keys = state.credentials().status(user).await?;

    Ok(Json(ApiResponse::success(SettingsResponse {
        custom_prompt,
        keys,
    })))
}

/// PUT /settings/prompt
pub async fn update_prompt(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdatePromptRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if let Some(prompt) = &payload.prompt {
        validate_prompt(prompt)?;
    }

    state
        .auth_service()
        .set_custom_prompt(user, payload.prompt)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Prompt saved".to_string(),
    })))
}

/// PUT /settings/keys/{provider}
pub async fn save_key(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(provider): Path<String>,
    Json(payload): Json<SaveKeyRequest>,
) -> Result<Json<ApiResponse<KeyStatus>>, ApiError> {
    let provider = validate_provider(&provider)?;

    state
        .credentials()
        .save(user, provider, &payload.key)
        .await?;

    tracing::info!(user_id = %user, provider = provider.as_str(), "API key saved");

    let status = state.credentials().status(user).await?;
    Ok(Json(ApiResponse::success(status)))
}

/// POST /settings/keys/{provider}/test
/// Tests the submitted key, or the stored one when the body has none
pub async fn test_key(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(provider): Path<String>,
    body: Bytes,
) -> Result<Json<ApiResponse<ConnectionTest>>, ApiError> {
    let provider = validate_provider(&provider)?;

    let payload: TestKeyRequest = if body.is_empty() {
        TestKeyRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::validation(format!("Invalid request body: {e}")))?
    };

    let submitted = payload.key.filter(|k| !k.trim().is_empty());

    let key = match submitted {
        Some(key) => key,
        None => state.credentials().reveal(user, provider).await?,
    };

    let result = state.llm().test_connection(provider, key.trim()).await;
    Ok(Json(ApiResponse::success(result)))
}
