//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::UserId;
use crate::services::auth_service::{AuthError, AuthService, UserInfo};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        let username = validate_username(username)?;
        validate_password(password, self.security.min_password_length)?;

        if self.store.get_user_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let user = self
            .store
            .create_user(&username, password, &self.security)
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(UserInfo::from(user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .verify_user_password(username.trim(), password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(UserInfo::from(user))
    }

    async fn get_user_info(&self, id: UserId) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }

    async fn get_custom_prompt(&self, id: UserId) -> Result<Option<String>, AuthError> {
        let user = self
            .store
            .get_user(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.custom_prompt)
    }

    async fn set_custom_prompt(
        &self,
        id: UserId,
        prompt: Option<String>,
    ) -> Result<(), AuthError> {
        let prompt = prompt.filter(|p| !p.trim().is_empty());
        self.store.update_custom_prompt(id, prompt).await?;
        Ok(())
    }
}

const MAX_USERNAME_LENGTH: usize = 50;

fn validate_username(username: &str) -> Result<String, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::Validation("Username cannot be empty".to_string()));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AuthError::Validation(format!(
            "Username must be {MAX_USERNAME_LENGTH} characters or less"
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(AuthError::Validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        ));
    }

    Ok(username.to_string())
}

fn validate_password(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::Validation(format!(
            "Password must be at least {min_length} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  alice ").unwrap(), "alice");
        assert!(validate_username("bob_the-builder.2").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("12345678", 8).is_ok());
        assert!(matches!(
            validate_password("short", 8),
            Err(AuthError::Validation(_))
        ));
    }
}
