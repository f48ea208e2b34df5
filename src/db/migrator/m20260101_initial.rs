use crate::entities::prelude::*;
use crate::entities::{api_keys, workflows};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Workflows)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ApiKeys)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workflows_user_id")
                    .table(Workflows)
                    .col(workflows::Column::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Required by the ON CONFLICT upsert in the credential repository.
        manager
            .create_index(
                Index::create()
                    .name("idx_api_keys_user_provider")
                    .table(ApiKeys)
                    .col(api_keys::Column::UserId)
                    .col(api_keys::Column::Provider)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiKeys).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Workflows).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
