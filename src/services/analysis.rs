//! Deterministic analysis derived from the workflow graph alone.
//!
//! Used as-is when no provider is selected and as the fallback when enrichment fails.

use serde_json::Value;

use crate::models::analysis::AnalysisResult;

pub const FALLBACK_TRIGGER: &str = "Manual Trigger";
pub const UNTITLED_WORKFLOW: &str = "Untitled Workflow";
pub const BASELINE_TAGS: [&str; 2] = ["imported", "new"];
pub const BASELINE_USE_CASES: [&str; 2] = ["Imported Workflow", "Automation"];

const MAX_LISTED_STEPS: usize = 5;
const MAX_SERVICE_NAMES: usize = 4;

/// Facts read from the `nodes` array plus the fallback analysis built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    pub node_count: usize,
    pub trigger: String,
    pub service_names: Vec<String>,
    pub analysis: AnalysisResult,
    pub tags: Vec<String>,
}

struct Node<'a> {
    name: Option<&'a str>,
    node_type: &'a str,
}

impl<'a> Node<'a> {
    fn from_value(value: &'a Value) -> Self {
        Self {
            name: value.get("name").and_then(Value::as_str),
            node_type: value.get("type").and_then(Value::as_str).unwrap_or_default(),
        }
    }

    /// Text after the last `.` of the node type, e.g. `httpRequest`.
    fn type_suffix(&self) -> &'a str {
        self.node_type
            .rsplit('.')
            .next()
            .unwrap_or(self.node_type)
    }

    fn label(&self) -> &'a str {
        self.name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.type_suffix())
    }

    fn is_trigger(&self) -> bool {
        let lowered = self.node_type.to_ascii_lowercase();
        lowered.contains("trigger") || lowered.contains("webhook")
    }
}

#[must_use]
pub fn baseline(workflow: &Value) -> Baseline {
    let nodes: Vec<Node<'_>> = workflow
        .get("nodes")
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().map(Node::from_value).collect())
        .unwrap_or_default();

    let node_count = nodes.len();

    let trigger = nodes
        .iter()
        .find(|n| n.is_trigger())
        .or_else(|| nodes.first())
        .map_or_else(|| FALLBACK_TRIGGER.to_string(), |n| n.label().to_string());

    let mut process_steps: Vec<String> = nodes
        .iter()
        .take(MAX_LISTED_STEPS)
        .map(|n| format!("Executes {} ({})", n.label(), n.type_suffix()))
        .collect();
    if node_count > MAX_LISTED_STEPS {
        process_steps.push(format!(
            "...and {} more steps.",
            node_count - MAX_LISTED_STEPS
        ));
    }

    let mut service_names: Vec<String> = Vec::new();
    for node in &nodes {
        if service_names.len() == MAX_SERVICE_NAMES {
            break;
        }
        let suffix = node.type_suffix();
        if !suffix.is_empty() && !service_names.iter().any(|s| s == suffix) {
            service_names.push(suffix.to_string());
        }
    }

    let analysis = AnalysisResult {
        summary: format!(
            "Imported workflow containing {node_count} nodes. Triggered by {trigger}."
        ),
        use_cases: BASELINE_USE_CASES.iter().map(ToString::to_string).collect(),
        technical_features: service_names
            .iter()
            .map(|s| format!("Integrates with {s}"))
            .collect(),
        process_steps,
        hashtags: Vec::new(),
    };

    Baseline {
        node_count,
        trigger,
        service_names,
        analysis,
        tags: BASELINE_TAGS.iter().map(ToString::to_string).collect(),
    }
}

/// JSON `name`, else the file name without `.json`, else a fixed placeholder.
#[must_use]
pub fn resolve_title(workflow: &Value, file_name: Option<&str>) -> String {
    if let Some(name) = workflow
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        return name.to_string();
    }

    file_name
        .map(|f| {
            let f = f.trim();
            f.strip_suffix(".json")
                .or_else(|| f.strip_suffix(".JSON"))
                .unwrap_or(f)
        })
        .filter(|f| !f.is_empty())
        .map_or_else(|| UNTITLED_WORKFLOW.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nodes(n: usize) -> Value {
        let nodes: Vec<Value> = (0..n)
            .map(|i| {
                json!({
                    "name": format!("Node {i}"),
                    "type": format!("n8n-nodes-base.svc{}", i % 6),
                })
            })
            .collect();
        json!({ "nodes": nodes })
    }

    #[test]
    fn single_manual_trigger() {
        let workflow = json!({
            "name": "Test",
            "nodes": [{"name": "Start", "type": "n8n-nodes-base.manualTrigger"}]
        });
        let b = baseline(&workflow);
        assert_eq!(b.node_count, 1);
        assert_eq!(b.trigger, "Start");
        assert_eq!(b.service_names, vec!["manualTrigger"]);
        assert_eq!(b.tags, vec!["imported", "new"]);
        assert_eq!(b.analysis.process_steps, vec!["Executes Start (manualTrigger)"]);
        assert_eq!(
            b.analysis.summary,
            "Imported workflow containing 1 nodes. Triggered by Start."
        );
        assert_eq!(
            b.analysis.technical_features,
            vec!["Integrates with manualTrigger"]
        );
    }

    #[test]
    fn step_count_follows_node_count() {
        for n in [0, 1, 4, 5, 6, 12] {
            let b = baseline(&nodes(n));
            assert_eq!(b.node_count, n);
            let expected = n.min(5) + usize::from(n > 5);
            assert_eq!(b.analysis.process_steps.len(), expected, "n = {n}");
        }
        let b = baseline(&nodes(12));
        assert_eq!(b.analysis.process_steps.last().unwrap(), "...and 7 more steps.");
    }

    #[test]
    fn service_names_are_distinct_and_capped() {
        let b = baseline(&nodes(12));
        assert_eq!(b.service_names, vec!["svc0", "svc1", "svc2", "svc3"]);

        let dupes = json!({"nodes": [
            {"name": "a", "type": "x.http"},
            {"name": "b", "type": "y.http"},
            {"name": "c", "type": "slack"}
        ]});
        assert_eq!(baseline(&dupes).service_names, vec!["http", "slack"]);
    }

    #[test]
    fn trigger_prefers_trigger_or_webhook_nodes() {
        let workflow = json!({"nodes": [
            {"name": "Set", "type": "n8n-nodes-base.set"},
            {"name": "Incoming", "type": "n8n-nodes-base.webhook"}
        ]});
        assert_eq!(baseline(&workflow).trigger, "Incoming");

        let unnamed = json!({"nodes": [{"type": "n8n-nodes-base.scheduleTrigger"}]});
        assert_eq!(baseline(&unnamed).trigger, "scheduleTrigger");

        let plain = json!({"nodes": [{"name": "First", "type": "a.b"}]});
        assert_eq!(baseline(&plain).trigger, "First");
    }

    #[test]
    fn empty_or_missing_nodes() {
        let b = baseline(&json!({"name": "x"}));
        assert_eq!(b.node_count, 0);
        assert_eq!(b.trigger, FALLBACK_TRIGGER);
        assert!(b.analysis.process_steps.is_empty());
        assert!(b.service_names.is_empty());

        let b = baseline(&json!([1, 2, 3]));
        assert_eq!(b.node_count, 0);
    }

    #[test]
    fn title_resolution() {
        assert_eq!(resolve_title(&json!({"name": "Sync"}), Some("f.json")), "Sync");
        assert_eq!(resolve_title(&json!({"name": "  "}), Some("orders.json")), "orders");
        assert_eq!(resolve_title(&json!({}), Some("notes.txt")), "notes.txt");
        assert_eq!(resolve_title(&json!({}), None), UNTITLED_WORKFLOW);
        assert_eq!(resolve_title(&json!({}), Some(".json")), UNTITLED_WORKFLOW);
    }
}
