use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::clients::llm::{LlmClient, WorkflowAnalyzer};
use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod error;
mod observability;
mod settings;
mod system;
mod types;
pub mod validation;
mod workflows;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{AuthService, CredentialStore, WorkflowService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn llm(&self) -> &Arc<LlmClient> {
        &self.shared.llm
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.shared.credentials
    }

    #[must_use]
    pub fn workflow_service(&self) -> &Arc<dyn WorkflowService> {
        &self.shared.workflow_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Like [`create_app_state_from_config`] with a substitute analyzer for uploads.
pub async fn create_app_state_with_analyzer(
    config: Config,
    analyzer: Arc<dyn WorkflowAnalyzer>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_analyzer(config, analyzer).await?);
    Ok(create_app_state(shared, None))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, inactivity_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_inactivity_minutes,
        )
    };

    let protected_routes = create_protected_router();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route(
            "/workflows",
            get(workflows::list_workflows).post(workflows::upload_workflow),
        )
        .route(
            "/workflows/{id}",
            get(workflows::get_workflow)
                .patch(workflows::update_workflow)
                .delete(workflows::delete_workflow),
        )
        .route("/settings", get(settings::get_settings))
        .route("/settings/prompt", put(settings::update_prompt))
        .route("/settings/keys/{provider}", put(settings::save_key))
        .route("/settings/keys/{provider}/test", post(settings::test_key))
        .route_layer(middleware::from_fn(auth::auth_middleware))
}
