//! Domain service for per-user provider API keys.
//!
//! Existence checks and key values are separate calls: `has`/`status` never touch the
//! ciphertext, and only `reveal` decrypts.

use serde::Serialize;
use thiserror::Error;

use crate::crypto::CryptoError;
use crate::domain::{Provider, UserId};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("No {} API key saved", .0.display_name())]
    NotFound(Provider),

    #[error("Stored {} API key could not be decrypted", .provider.display_name())]
    Decryption {
        provider: Provider,
        #[source]
        source: CryptoError,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CredentialError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CredentialError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Which providers have a saved key. Carries no key material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyStatus {
    pub openai: bool,
    pub anthropic: bool,
    pub gemini: bool,
}

impl KeyStatus {
    #[must_use]
    pub const fn get(&self, provider: Provider) -> bool {
        match provider {
            Provider::OpenAi => self.openai,
            Provider::Anthropic => self.anthropic,
            Provider::Gemini => self.gemini,
        }
    }

    pub const fn set(&mut self, provider: Provider, present: bool) {
        match provider {
            Provider::OpenAi => self.openai = present,
            Provider::Anthropic => self.anthropic = present,
            Provider::Gemini => self.gemini = present,
        }
    }
}

#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Encrypts with a fresh IV and creates or overwrites the stored key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Validation`] for a blank key.
    async fn save(
        &self,
        user: UserId,
        provider: Provider,
        plaintext: &str,
    ) -> Result<(), CredentialError>;

    async fn has(&self, user: UserId, provider: Provider) -> Result<bool, CredentialError>;

    /// Decrypts the stored key for an outbound provider call.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::NotFound`] when nothing is saved and
    /// [`CredentialError::Decryption`] when the record cannot be opened.
    async fn reveal(&self, user: UserId, provider: Provider) -> Result<String, CredentialError>;

    async fn status(&self, user: UserId) -> Result<KeyStatus, CredentialError> {
        let mut status = KeyStatus::default();
        for provider in Provider::ALL {
            status.set(provider, self.has(user, provider).await?);
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_status_serializes_flags_only() {
        let mut status = KeyStatus::default();
        status.set(Provider::Gemini, true);
        assert!(status.get(Provider::Gemini));
        assert!(!status.get(Provider::OpenAi));

        let json = serde_json::to_value(status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"openai": false, "anthropic": false, "gemini": true})
        );
    }
}
