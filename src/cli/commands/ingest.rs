//! Ingest command handler

use std::path::Path;

use super::{open_state, resolve_user};
use crate::collection::ClientSettings;
use crate::config::Config;
use crate::domain::{Language, Provider};
use crate::services::{EnrichmentOutcome, IngestRequest};

pub struct IngestArgs<'a> {
    pub file: &'a Path,
    pub username: &'a str,
    pub provider: Option<Provider>,
    pub language: Option<&'a str>,
    pub model: Option<String>,
}

/// Explicit choice first, then the saved preference. Gemini uploads default to the saved
/// Gemini model. Without a saved key for the provider the upload keeps its basic analysis.
fn resolve_provider(
    settings: &ClientSettings,
    requested: Option<Provider>,
    model: Option<String>,
) -> (Provider, Option<String>) {
    let provider = requested.unwrap_or(settings.provider);
    let model_hint =
        model.or_else(|| (provider == Provider::Gemini).then(|| settings.gemini_model.clone()));
    (provider, model_hint)
}

pub async fn cmd_ingest(
    config: &Config,
    settings: &ClientSettings,
    args: IngestArgs<'_>,
) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(args.file)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", args.file.display()))?;

    let state = open_state(config).await?;
    let owner = resolve_user(&state, args.username).await?;

    let (provider, model_hint) = resolve_provider(settings, args.provider, args.model);

    let report = state
        .workflow_service
        .ingest(IngestRequest {
            owner,
            raw,
            file_name: args
                .file
                .file_name()
                .map(|f| f.to_string_lossy().into_owned()),
            provider: Some(provider),
            language: args
                .language
                .map_or(settings.language, Language::from_code),
            model_hint,
        })
        .await?;

    let workflow = &report.workflow;
    println!("✓ Stored \"{}\" (ID: {})", workflow.title, workflow.id);
    println!(
        "  Nodes: {} | Trigger: {} | Services: {}",
        workflow.node_count,
        workflow.trigger,
        workflow.service_names.join(", ")
    );
    println!("  Tags: {}", workflow.tags.join(", "));

    match &report.enrichment {
        EnrichmentOutcome::Succeeded { provider } => {
            println!("  Analyzed with {}", provider.display_name());
        }
        EnrichmentOutcome::Skipped => {
            println!(
                "  Basic analysis only (no saved {} key)",
                provider.display_name()
            );
        }
        EnrichmentOutcome::Failed { .. } => {
            if let Some(warning) = report.enrichment.warning() {
                println!("  ⚠ {warning}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_saved_provider() {
        let settings = ClientSettings {
            provider: Provider::Gemini,
            gemini_model: "models/gemini-1.5-pro".to_string(),
            ..ClientSettings::default()
        };

        let (provider, model) = resolve_provider(&settings, None, None);
        assert_eq!(provider, Provider::Gemini);
        assert_eq!(model.as_deref(), Some("models/gemini-1.5-pro"));

        let (provider, model) = resolve_provider(&settings, Some(Provider::Anthropic), None);
        assert_eq!(provider, Provider::Anthropic);
        assert!(model.is_none());

        let (_, model) = resolve_provider(&settings, None, Some("gemini-2.0-flash".into()));
        assert_eq!(model.as_deref(), Some("gemini-2.0-flash"));
    }
}
