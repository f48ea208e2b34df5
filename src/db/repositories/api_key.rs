use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};

use crate::domain::{Provider, UserId};
use crate::entities::api_keys;

/// Stored ciphertext for one provider key, hex encoded as in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedKeyRow {
    pub key_hex: String,
    pub iv_hex: String,
}

pub struct ApiKeyRepository {
    conn: DatabaseConnection,
}

impl ApiKeyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts or overwrites the key for `(user, provider)` in one statement.
    pub async fn upsert(
        &self,
        user: UserId,
        provider: Provider,
        key_hex: &str,
        iv_hex: &str,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = api_keys::ActiveModel {
            user_id: Set(user.value()),
            provider: Set(provider.as_str().to_string()),
            key: Set(key_hex.to_string()),
            iv: Set(iv_hex.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        api_keys::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([api_keys::Column::UserId, api_keys::Column::Provider])
                    .update_columns([
                        api_keys::Column::Key,
                        api_keys::Column::Iv,
                        api_keys::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to upsert api key")?;

        Ok(())
    }

    pub async fn exists(&self, user: UserId, provider: Provider) -> Result<bool> {
        let count = api_keys::Entity::find()
            .filter(api_keys::Column::UserId.eq(user.value()))
            .filter(api_keys::Column::Provider.eq(provider.as_str()))
            .count(&self.conn)
            .await
            .context("Failed to count api keys")?;

        Ok(count > 0)
    }

    pub async fn find(&self, user: UserId, provider: Provider) -> Result<Option<SealedKeyRow>> {
        let row = api_keys::Entity::find()
            .filter(api_keys::Column::UserId.eq(user.value()))
            .filter(api_keys::Column::Provider.eq(provider.as_str()))
            .one(&self.conn)
            .await
            .context("Failed to query api key")?;

        Ok(row.map(|r| SealedKeyRow {
            key_hex: r.key,
            iv_hex: r.iv,
        }))
    }
}
