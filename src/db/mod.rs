use crate::config::SecurityConfig;
use crate::domain::{Provider, UserId, WorkflowId};
use crate::models::workflow::{NewWorkflow, Workflow, WorkflowUpdate};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::api_key::SealedKeyRow;
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn workflow_repo(&self) -> repositories::workflow::WorkflowRepository {
        repositories::workflow::WorkflowRepository::new(self.conn.clone())
    }

    fn api_key_repo(&self) -> repositories::api_key::ApiKeyRepository {
        repositories::api_key::ApiKeyRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo().create(username, password, security).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_custom_prompt(&self, id: UserId, prompt: Option<String>) -> Result<()> {
        self.user_repo().update_custom_prompt(id, prompt).await
    }

    // ========================================================================
    // Workflows
    // ========================================================================

    pub async fn insert_workflow(&self, workflow: &NewWorkflow) -> Result<Workflow> {
        self.workflow_repo().insert(workflow).await
    }

    pub async fn list_workflows(&self, owner: UserId) -> Result<Vec<Workflow>> {
        self.workflow_repo().list_for_user(owner).await
    }

    pub async fn get_workflow(&self, id: WorkflowId, owner: UserId) -> Result<Option<Workflow>> {
        self.workflow_repo().get(id, owner).await
    }

    pub async fn update_workflow(
        &self,
        id: WorkflowId,
        owner: UserId,
        update: &WorkflowUpdate,
    ) -> Result<bool> {
        self.workflow_repo().update(id, owner, update).await
    }

    pub async fn delete_workflow(&self, id: WorkflowId, owner: UserId) -> Result<bool> {
        self.workflow_repo().delete(id, owner).await
    }

    // ========================================================================
    // API keys
    // ========================================================================

    pub async fn upsert_api_key(
        &self,
        user: UserId,
        provider: Provider,
        key_hex: &str,
        iv_hex: &str,
    ) -> Result<()> {
        self.api_key_repo()
            .upsert(user, provider, key_hex, iv_hex)
            .await
    }

    pub async fn api_key_exists(&self, user: UserId, provider: Provider) -> Result<bool> {
        self.api_key_repo().exists(user, provider).await
    }

    pub async fn find_api_key(
        &self,
        user: UserId,
        provider: Provider,
    ) -> Result<Option<SealedKeyRow>> {
        self.api_key_repo().find(user, provider).await
    }
}
