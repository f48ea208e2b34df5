//! Client preferences, kept as an explicit value and persisted as TOML.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{Language, Provider, WorkflowId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub language: Language,

    /// Provider used for new uploads.
    pub provider: Provider,

    pub gemini_model: String,

    pub favorites: Vec<WorkflowId>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            provider: Provider::OpenAi,
            gemini_model: "models/gemini-1.5-flash".to_string(),
            favorites: Vec::new(),
        }
    }
}

impl ClientSettings {
    /// `~/.config/flowhub/client.toml` or `./client.toml` without a config dir.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("client.toml"),
            |dir| dir.join("flowhub").join("client.toml"),
        )
    }

    /// Missing files yield the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        debug!("Client settings saved to: {}", path.display());
        Ok(())
    }

    #[must_use]
    pub fn is_favorite(&self, id: WorkflowId) -> bool {
        self.favorites.contains(&id)
    }

    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: WorkflowId) -> bool {
        if let Some(pos) = self.favorites.iter().position(|f| *f == id) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(id);
            true
        }
    }

    /// Loads, applies `change` and writes the result back.
    pub fn update_at<F>(path: &Path, change: F) -> Result<Self>
    where
        F: FnOnce(&mut Self),
    {
        let mut settings = Self::load_from_path(path)?;
        change(&mut settings);
        settings.save_to_path(path)?;
        Ok(settings)
    }
}
