mod delete;
mod favorite;
mod ingest;
mod init;
mod list;
mod register;
mod set_key;

pub use delete::cmd_delete_workflow;
pub use favorite::cmd_toggle_favorite;
pub use ingest::{IngestArgs, cmd_ingest};
pub use init::cmd_init;
pub use list::cmd_list_workflows;
pub use register::cmd_register;
pub use set_key::cmd_set_key;

use crate::config::Config;
use crate::domain::UserId;
use crate::state::SharedState;

async fn open_state(config: &Config) -> anyhow::Result<SharedState> {
    SharedState::new(config.clone()).await
}

async fn resolve_user(state: &SharedState, username: &str) -> anyhow::Result<UserId> {
    state
        .store
        .get_user_by_username(username)
        .await?
        .map(|u| u.id)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "User '{username}' not found. Create it with: flowhub register {username}"
            )
        })
}
