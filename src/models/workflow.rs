use serde::{Deserialize, Serialize};

use crate::domain::{UserId, WorkflowId};

/// A persisted workflow with its derived metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: WorkflowId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub use_cases: Vec<String>,
    pub process_steps: Vec<String>,
    pub technical_features: Vec<String>,
    pub service_names: Vec<String>,
    pub node_count: usize,
    pub trigger: String,
    /// Uploaded document, byte-for-byte.
    pub raw_json: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields resolved by the analysis pipeline, ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkflow {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub use_cases: Vec<String>,
    pub process_steps: Vec<String>,
    pub technical_features: Vec<String>,
    pub service_names: Vec<String>,
    pub node_count: usize,
    pub trigger: String,
    pub raw_json: String,
}

/// Metadata edit. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl WorkflowUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.tags.is_none()
    }

    /// Applies the present fields to an in-memory copy.
    pub fn apply_to(&self, workflow: &mut Workflow) {
        if let Some(title) = &self.title {
            workflow.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            workflow.description.clone_from(description);
        }
        if let Some(tags) = &self.tags {
            workflow.tags = normalize_tags(tags.iter().cloned());
        }
    }
}

/// Trims, drops empties and de-duplicates while keeping first-seen order.
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_tags_dedups_in_order() {
        let tags = normalize_tags(
            ["a", " b ", "a", "", "c", "b"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn update_emptiness() {
        assert!(WorkflowUpdate::default().is_empty());
        let update = WorkflowUpdate {
            title: Some("x".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn update_deserializes_partial_body() {
        let update: WorkflowUpdate = serde_json::from_str(r#"{"tags": ["x", "x"]}"#).unwrap();
        assert!(update.title.is_none());
        assert_eq!(update.tags, Some(vec!["x".to_string(), "x".to_string()]));
    }
}
