//! Domain service for registration, login and per-user preferences.

use serde::Serialize;
use thiserror::Error;

use crate::domain::UserId;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::db::User> for UserInfo {
    fn from(user: crate::db::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] or [`AuthError::Validation`].
    async fn register(&self, username: &str, password: &str) -> Result<UserInfo, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AuthError>;

    async fn get_user_info(&self, id: UserId) -> Result<UserInfo, AuthError>;

    async fn get_custom_prompt(&self, id: UserId) -> Result<Option<String>, AuthError>;

    /// Blank prompts clear the override.
    async fn set_custom_prompt(&self, id: UserId, prompt: Option<String>)
    -> Result<(), AuthError>;
}
