//! Pure filtering and ordering over a workflow list.

use serde::{Deserialize, Serialize};

use crate::domain::WorkflowId;
use crate::models::workflow::Workflow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowFilter {
    /// Only workflows carrying this tag.
    pub folder_tag: Option<String>,
    /// Case-insensitive match on title, description and tags.
    pub search: Option<String>,
    pub favorites_only: bool,
    pub favorites: Vec<WorkflowId>,
}

impl WorkflowFilter {
    fn matches(&self, workflow: &Workflow) -> bool {
        if let Some(tag) = self.folder_tag.as_deref().map(str::trim).filter(|t| !t.is_empty())
            && !workflow.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
        {
            return false;
        }

        if self.favorites_only && !self.favorites.contains(&workflow.id) {
            return false;
        }

        match self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
        {
            Some(query) => matches_search(workflow, query),
            None => true,
        }
    }
}

fn matches_search(workflow: &Workflow, query: &str) -> bool {
    let query = query.to_lowercase();
    if workflow.title.to_lowercase().contains(&query)
        || workflow.description.to_lowercase().contains(&query)
    {
        return true;
    }

    let tag_query = query.trim_start_matches('#');
    workflow.tags.iter().any(|tag| {
        tag.to_lowercase()
            .trim_start_matches('#')
            .contains(tag_query)
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

/// Workflows matching every criterion of `criteria`, in input order.
#[must_use]
pub fn filter(workflows: &[Workflow], criteria: &WorkflowFilter) -> Vec<Workflow> {
    workflows
        .iter()
        .filter(|w| criteria.matches(w))
        .cloned()
        .collect()
}

/// Newest/Oldest order by id; title orders ignore case and fall back to id.
#[must_use]
pub fn sort(mut workflows: Vec<Workflow>, order: SortOrder) -> Vec<Workflow> {
    match order {
        SortOrder::Newest => workflows.sort_by(|a, b| b.id.cmp(&a.id)),
        SortOrder::Oldest => workflows.sort_by(|a, b| a.id.cmp(&b.id)),
        SortOrder::TitleAsc => workflows.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then(a.id.cmp(&b.id))
        }),
        SortOrder::TitleDesc => workflows.sort_by(|a, b| {
            b.title
                .to_lowercase()
                .cmp(&a.title.to_lowercase())
                .then(b.id.cmp(&a.id))
        }),
    }
    workflows
}

/// Number of workflows a folder tag would show; agrees with `filter` on `folder_tag`.
#[must_use]
pub fn tag_count(workflows: &[Workflow], tag: &str) -> usize {
    let tag = tag.trim();
    workflows
        .iter()
        .filter(|w| w.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
        .count()
}

/// The `limit` most used tags, written with a leading `#`.
///
/// `crm` and `#crm` count as the same tag. Ties keep first-seen order.
#[must_use]
pub fn popular_tags(workflows: &[Workflow], limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for tag in workflows.iter().flat_map(|w| &w.tags) {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let hashtag = if tag.starts_with('#') {
            tag.to_string()
        } else {
            format!("#{tag}")
        };
        match counts.iter_mut().find(|(t, _)| *t == hashtag) {
            Some((_, n)) => *n += 1,
            None => counts.push((hashtag, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(t, _)| t).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::UserId;

    pub(crate) fn workflow(id: i32, title: &str, tags: &[&str]) -> Workflow {
        Workflow {
            id: WorkflowId::new(id),
            user_id: UserId::new(1),
            title: title.to_string(),
            description: format!("{title} description"),
            tags: tags.iter().map(ToString::to_string).collect(),
            use_cases: Vec::new(),
            process_steps: Vec::new(),
            technical_features: Vec::new(),
            service_names: Vec::new(),
            node_count: 0,
            trigger: "Manual Trigger".to_string(),
            raw_json: "{}".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn titles(list: &[Workflow]) -> Vec<&str> {
        list.iter().map(|w| w.title.as_str()).collect()
    }

    #[test]
    fn title_descending() {
        let list = vec![
            workflow(1, "Alpha", &[]),
            workflow(2, "Zeta", &[]),
            workflow(3, "Mid", &[]),
        ];
        let sorted = sort(list, SortOrder::TitleDesc);
        assert_eq!(titles(&sorted), vec!["Zeta", "Mid", "Alpha"]);
    }

    #[test]
    fn title_ascending_ignores_case() {
        let list = vec![workflow(1, "beta", &[]), workflow(2, "Alpha", &[])];
        assert_eq!(titles(&sort(list, SortOrder::TitleAsc)), vec!["Alpha", "beta"]);
    }

    #[test]
    fn id_orders() {
        let list = vec![workflow(2, "b", &[]), workflow(7, "c", &[]), workflow(1, "a", &[])];
        assert_eq!(titles(&sort(list.clone(), SortOrder::Newest)), vec!["c", "b", "a"]);
        assert_eq!(titles(&sort(list, SortOrder::Oldest)), vec!["a", "b", "c"]);
    }

    #[test]
    fn search_covers_title_description_and_tags() {
        let list = vec![
            workflow(1, "Slack digest", &["chat"]),
            workflow(2, "Invoice sync", &["#finance"]),
            workflow(3, "Backup", &["ops"]),
        ];

        let by = |q: &str| {
            let criteria = WorkflowFilter {
                search: Some(q.to_string()),
                ..Default::default()
            };
            titles(&filter(&list, &criteria))
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        };

        assert_eq!(by("SLACK"), vec!["Slack digest"]);
        assert_eq!(by("#finance"), vec!["Invoice sync"]);
        assert_eq!(by("finance"), vec!["Invoice sync"]);
        assert_eq!(by("#ops"), vec!["Backup"]);
        assert_eq!(by("backup description"), vec!["Backup"]);
        assert_eq!(by("   ").len(), 3);
    }

    #[test]
    fn folder_and_favorites() {
        let list = vec![
            workflow(1, "A", &["crm"]),
            workflow(2, "B", &["crm", "email"]),
            workflow(3, "C", &["email"]),
        ];

        let criteria = WorkflowFilter {
            folder_tag: Some("crm".into()),
            ..Default::default()
        };
        assert_eq!(titles(&filter(&list, &criteria)), vec!["A", "B"]);

        let criteria = WorkflowFilter {
            favorites_only: true,
            favorites: vec![WorkflowId::new(2), WorkflowId::new(3)],
            folder_tag: Some("email".into()),
            ..Default::default()
        };
        assert_eq!(titles(&filter(&list, &criteria)), vec!["B", "C"]);

        let criteria = WorkflowFilter {
            favorites_only: true,
            ..Default::default()
        };
        assert!(filter(&list, &criteria).is_empty());
    }

    #[test]
    fn popular_tags_merge_hash_prefix_and_rank_by_count() {
        let list = vec![
            workflow(1, "A", &["email", "crm"]),
            workflow(2, "B", &["#crm", "ops"]),
            workflow(3, "C", &["crm", "#email", "slack"]),
            workflow(4, "D", &["ai", "sheets", " "]),
        ];

        assert_eq!(
            popular_tags(&list, 5),
            vec!["#crm", "#email", "#ops", "#slack", "#ai"]
        );
        assert_eq!(popular_tags(&list, 1), vec!["#crm"]);
        assert!(popular_tags(&[], 5).is_empty());
    }

    #[test]
    fn tag_count_matches_folder_filter() {
        let list = vec![
            workflow(1, "A", &["crm"]),
            workflow(2, "B", &["CRM", "email"]),
            workflow(3, "C", &["email"]),
        ];

        assert_eq!(tag_count(&list, "crm"), 2);
        assert_eq!(tag_count(&list, "email"), 2);
        assert_eq!(tag_count(&list, "finance"), 0);

        let criteria = WorkflowFilter {
            folder_tag: Some("crm".into()),
            ..Default::default()
        };
        assert_eq!(filter(&list, &criteria).len(), tag_count(&list, "crm"));
    }
}
