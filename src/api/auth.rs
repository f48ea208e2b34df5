use axum::{
    Extension, Json,
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::domain::UserId;
use crate::services::{AuthError, UserInfo};

/// Session key holding the authenticated user's id.
const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated caller, inserted by [`auth_middleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized("Invalid credentials".to_string()),
            AuthError::UserNotFound => Self::Unauthorized("User not found".to_string()),
            AuthError::UsernameTaken => Self::Conflict("Username already taken".to_string()),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a session and hands the user id to handlers.
pub async fn auth_middleware(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let user = get_session_user(&session).await?;
    tracing::Span::current().record("user_id", user.value());

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state
        .auth_service()
        .register(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/login
/// Verifies credentials and starts a cookie session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> Json<ApiResponse<MessageResponse>> {
    let _ = session.flush().await;
    Json(ApiResponse::success(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state.auth_service().get_user_info(user).await?;
    Ok(Json(ApiResponse::success(info)))
}

// ============================================================================
// Helpers
// ============================================================================

/// Get user id from session, returns error if not authenticated
async fn get_session_user(session: &Session) -> Result<UserId, ApiError> {
    session
        .get::<UserId>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(ApiError::unauthorized)
}
