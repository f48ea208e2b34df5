//! List workflows command handler

use super::{open_state, resolve_user};
use crate::collection::{
    ClientSettings, SortOrder, WorkflowFilter, filter, popular_tags, sort, tag_count,
};
use crate::config::Config;

const POPULAR_TAG_LIMIT: usize = 5;

pub async fn cmd_list_workflows(
    config: &Config,
    settings: &ClientSettings,
    username: &str,
    criteria: WorkflowFilter,
    order: SortOrder,
) -> anyhow::Result<()> {
    let state = open_state(config).await?;
    let owner = resolve_user(&state, username).await?;

    let all = state.workflow_service.list(owner).await?;
    let folder = criteria.folder_tag.clone();
    let criteria = WorkflowFilter {
        favorites: settings.favorites.clone(),
        ..criteria
    };
    let shown = sort(filter(&all, &criteria), order);

    if shown.is_empty() {
        if all.is_empty() {
            println!("No workflows stored yet.");
            println!();
            println!("Add one with: flowhub ingest <file.json> --user {username}");
        } else {
            println!("No workflows match the given filters.");
        }
        return Ok(());
    }

    println!("Workflows ({} of {} shown)", shown.len(), all.len());
    if let Some(folder) = folder.as_deref() {
        println!("Folder {folder}: {} workflows", tag_count(&all, folder));
    }
    let popular = popular_tags(&all, POPULAR_TAG_LIMIT);
    if !popular.is_empty() {
        println!("Popular tags: {}", popular.join(" "));
    }
    println!("{:-<70}", "");

    for workflow in shown {
        let marker = if settings.is_favorite(workflow.id) {
            "★"
        } else {
            "•"
        };
        println!("{} {} [{} nodes]", marker, workflow.title, workflow.node_count);
        println!(
            "  ID: {} | Trigger: {} | Tags: {}",
            workflow.id,
            workflow.trigger,
            workflow.tags.join(", ")
        );
    }

    Ok(())
}
