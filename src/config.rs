use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::{ModelId, Provider};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MemchatConfig {
    pub logging: LoggingConfig,
    pub session: SessionConfig,
    pub memory: MemoryConfig,
    pub completion: CompletionConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: String,
    pub model: ModelId,
    /// Number of trailing transcript messages treated as "recent".
    pub recent_window: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub search_limit: usize,
    /// Upper bound on records read by a memory audit.
    pub audit_max_memories: usize,
    pub page_size: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CompletionConfig {
    pub chat_temperature: f32,
    pub audit_temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: ProviderConfig,
    pub xai: ProviderConfig,
    pub anthropic: ProviderConfig,
    pub google: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProviderConfig {
    /// Overrides the provider's public endpoint.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: "default_user".into(),
            model: ModelId::default(),
            recent_window: 40,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mem0.ai".into(),
            api_key: None,
            search_limit: 8,
            audit_max_memories: 500,
            page_size: 100,
            timeout_secs: 30,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            chat_temperature: 0.7,
            audit_temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

impl ProvidersConfig {
    pub fn get(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::XAi => &self.xai,
            Provider::Anthropic => &self.anthropic,
            Provider::Google => &self.google,
        }
    }

    /// Configured endpoint for a provider, or its public OpenAI-compatible one.
    pub fn base_url(&self, provider: Provider) -> &str {
        self.get(provider)
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| default_base_url(provider))
    }
}

pub fn default_base_url(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "https://api.openai.com/v1",
        Provider::XAi => "https://api.x.ai/v1",
        Provider::Anthropic => "https://api.anthropic.com/v1",
        Provider::Google => "https://generativelanguage.googleapis.com/v1beta/openai",
    }
}

/// Returns `~/.memchat/`, or `./.memchat/` when no home directory is known.
pub fn default_memchat_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".memchat")
}

/// Returns the default config file path: `~/.memchat/config.toml`
pub fn default_config_path() -> PathBuf {
    default_memchat_dir().join("config.toml")
}

impl MemchatConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MemchatConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides for settings and provider secrets.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(val) = env_value(&["MEMCHAT_LOG_LEVEL"]) {
            self.logging.log_level = val;
        }
        if let Some(val) = env_value(&["MEMCHAT_USER_ID"]) {
            self.session.user_id = val;
        }
        if let Some(val) = env_value(&["MEMCHAT_MODEL"]) {
            self.session.model = val
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("invalid MEMCHAT_MODEL")?;
        }
        if let Some(val) = env_value(&["MEM0_BASE_URL"]) {
            self.memory.base_url = val;
        }
        if let Some(val) = env_value(&["MEM0_API_KEY"]) {
            self.memory.api_key = Some(val);
        }
        if let Some(val) = env_value(&["OPENAI_API_KEY"]) {
            self.providers.openai.api_key = Some(val);
        }
        if let Some(val) = env_value(&["GROK_API_KEY", "XAI_API_KEY"]) {
            self.providers.xai.api_key = Some(val);
        }
        if let Some(val) = env_value(&["ANTHROPIC_API_KEY"]) {
            self.providers.anthropic.api_key = Some(val);
        }
        if let Some(val) = env_value(&["GEMINI_API_KEY", "GOOGLE_API_KEY"]) {
            self.providers.google.api_key = Some(val);
        }
        Ok(())
    }
}

/// First non-empty value among the given environment variables.
fn env_value(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
}
