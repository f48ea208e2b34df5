use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::llm::{LlmClient, WorkflowAnalyzer};
use crate::config::Config;
use crate::crypto::EncryptionKey;
use crate::db::Store;
use crate::services::{
    AuthService, CredentialStore, SeaOrmAuthService, SeaOrmCredentialStore,
    SeaOrmWorkflowService, WorkflowService,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all providers to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("flowhub/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub llm: Arc<LlmClient>,

    pub credentials: Arc<dyn CredentialStore>,

    pub workflow_service: Arc<dyn WorkflowService>,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::init(config, None).await
    }

    /// Same as [`SharedState::new`] but ingestion uses `analyzer` instead of the
    /// HTTP client.
    pub async fn with_analyzer(
        config: Config,
        analyzer: Arc<dyn WorkflowAnalyzer>,
    ) -> anyhow::Result<Self> {
        Self::init(config, Some(analyzer)).await
    }

    async fn init(
        config: Config,
        analyzer: Option<Arc<dyn WorkflowAnalyzer>>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let key = EncryptionKey::from_secret(&config.security.encryption_key)
            .map_err(|e| anyhow::anyhow!("Invalid security.encryption_key: {e}"))?;

        let http_client = build_shared_http_client(config.ai.request_timeout_seconds)?;
        let llm = Arc::new(LlmClient::new(http_client, config.ai.clone()));
        let analyzer = analyzer.unwrap_or_else(|| llm.clone() as Arc<dyn WorkflowAnalyzer>);

        let credentials = Arc::new(SeaOrmCredentialStore::new(store.clone(), key))
            as Arc<dyn CredentialStore + Send + Sync + 'static>;

        let workflow_service = Arc::new(SeaOrmWorkflowService::new(
            store.clone(),
            credentials.clone(),
            analyzer,
        )) as Arc<dyn WorkflowService + Send + Sync + 'static>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            llm,
            credentials,
            workflow_service,
            auth_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
