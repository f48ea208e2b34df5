//! `SeaORM` implementation of the `CredentialStore` trait.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::crypto::{self, EncryptionKey};
use crate::db::Store;
use crate::domain::{Provider, UserId};
use crate::services::credential_service::{CredentialError, CredentialStore};

pub struct SeaOrmCredentialStore {
    store: Store,
    key: EncryptionKey,
}

impl SeaOrmCredentialStore {
    #[must_use]
    pub const fn new(store: Store, key: EncryptionKey) -> Self {
        Self { store, key }
    }
}

#[async_trait]
impl CredentialStore for SeaOrmCredentialStore {
    async fn save(
        &self,
        user: UserId,
        provider: Provider,
        plaintext: &str,
    ) -> Result<(), CredentialError> {
        let plaintext = plaintext.trim();
        if plaintext.is_empty() {
            return Err(CredentialError::Validation(
                "API key cannot be empty".to_string(),
            ));
        }

        let sealed = crypto::seal(&self.key, plaintext.as_bytes())
            .map_err(|e| CredentialError::Internal(e.to_string()))?;

        self.store
            .upsert_api_key(user, provider, &sealed.ciphertext_hex(), &sealed.iv_hex())
            .await?;

        debug!(user_id = %user, provider = provider.as_str(), "Saved API key");
        Ok(())
    }

    async fn has(&self, user: UserId, provider: Provider) -> Result<bool, CredentialError> {
        Ok(self.store.api_key_exists(user, provider).await?)
    }

    async fn reveal(&self, user: UserId, provider: Provider) -> Result<String, CredentialError> {
        let row = self
            .store
            .find_api_key(user, provider)
            .await?
            .ok_or(CredentialError::NotFound(provider))?;

        crypto::open_hex(&self.key, &row.iv_hex, &row.key_hex).map_err(|source| {
            warn!(
                user_id = %user,
                provider = provider.as_str(),
                error = %source,
                "Failed to decrypt stored API key"
            );
            CredentialError::Decryption { provider, source }
        })
    }
}
