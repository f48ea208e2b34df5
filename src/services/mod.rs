pub mod analysis;
pub use analysis::{Baseline, baseline, resolve_title};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod credential_service;
pub mod credential_service_impl;
pub use credential_service::{CredentialError, CredentialStore, KeyStatus};
pub use credential_service_impl::SeaOrmCredentialStore;

pub mod workflow_service;
pub mod workflow_service_impl;
pub use workflow_service::{
    EnrichmentOutcome, IngestReport, IngestRequest, WorkflowError, WorkflowService,
};
pub use workflow_service_impl::SeaOrmWorkflowService;
