//! Delete workflow command handler

use super::{open_state, resolve_user};
use crate::collection::ClientSettings;
use crate::config::Config;
use crate::domain::WorkflowId;
use std::path::Path;

pub async fn cmd_delete_workflow(
    config: &Config,
    settings_path: &Path,
    username: &str,
    id: i32,
) -> anyhow::Result<()> {
    if id <= 0 {
        anyhow::bail!("Invalid workflow ID: {id}");
    }
    let id = WorkflowId::new(id);

    let state = open_state(config).await?;
    let owner = resolve_user(&state, username).await?;

    if state.workflow_service.delete(id, owner).await? {
        ClientSettings::update_at(settings_path, |settings| {
            settings.favorites.retain(|f| *f != id);
        })?;
        println!("✓ Deleted workflow {id}");
    } else {
        println!("Workflow {id} not found for {username}, nothing deleted.");
    }
    Ok(())
}
