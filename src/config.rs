use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable that overrides `security.encryption_key`.
pub const ENCRYPTION_KEY_ENV: &str = "FLOWHUB_ENCRYPTION_KEY";

/// Development fallback. `Config::validate` only checks the length, so production
/// deployments must override it through the config file or the environment.
const DEV_ENCRYPTION_KEY: &str = "flowhub-dev-key-change-me-000000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub ai: AiConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/flowhub.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions expire after this many minutes without a request.
    pub session_inactivity_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 7450,
            cors_allowed_origins: vec![
                "http://localhost:7450".to_string(),
                "http://127.0.0.1:7450".to_string(),
            ],
            secure_cookies: true,
            session_inactivity_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    pub min_password_length: usize,

    /// 32-byte secret used to encrypt stored provider API keys.
    /// Overridden by `FLOWHUB_ENCRYPTION_KEY` when set.
    pub encryption_key: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            min_password_length: 8,
            encryption_key: DEV_ENCRYPTION_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub openai_base_url: String,

    pub openai_model: String,

    pub anthropic_base_url: String,

    pub anthropic_model: String,

    pub anthropic_version: String,

    pub anthropic_max_tokens: u32,

    pub gemini_base_url: String,

    /// Default Gemini model, with or without the `models/` prefix.
    pub gemini_model: String,

    /// Request timeout in seconds (default: 120)
    pub request_timeout_seconds: u64,

    /// Maximum number of characters of workflow JSON sent to a provider.
    pub max_payload_chars: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_base_url: "https://api.openai.com".to_string(),
            openai_model: "gpt-4o".to_string(),
            anthropic_base_url: "https://api.anthropic.com".to_string(),
            anthropic_model: "claude-3-5-sonnet-20240620".to_string(),
            anthropic_version: "2023-06-01".to_string(),
            anthropic_max_tokens: 1024,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "models/gemini-1.5-flash".to_string(),
            request_timeout_seconds: 120,
            max_payload_chars: 25_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            ai: AiConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides();

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(ENCRYPTION_KEY_ENV)
            && !key.is_empty()
        {
            self.security.encryption_key = key;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("flowhub").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".flowhub").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("general.database_path cannot be empty");
        }

        if self.security.encryption_key.len() != crate::crypto::KEY_SIZE {
            anyhow::bail!(
                "security.encryption_key must be exactly {} bytes (got {})",
                crate::crypto::KEY_SIZE,
                self.security.encryption_key.len()
            );
        }

        if self.ai.max_payload_chars == 0 {
            anyhow::bail!("ai.max_payload_chars must be > 0");
        }

        Ok(())
    }
}
