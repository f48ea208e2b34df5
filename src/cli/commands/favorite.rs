//! Favorite command handler

use std::path::Path;

use crate::collection::ClientSettings;
use crate::domain::WorkflowId;

pub fn cmd_toggle_favorite(settings_path: &Path, id: i32) -> anyhow::Result<()> {
    let id = WorkflowId::new(id);
    let mut now_favorite = false;
    ClientSettings::update_at(settings_path, |settings| {
        now_favorite = settings.toggle_favorite(id);
    })?;

    if now_favorite {
        println!("★ Workflow {id} added to favorites");
    } else {
        println!("Workflow {id} removed from favorites");
    }
    Ok(())
}
