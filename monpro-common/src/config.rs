//! Configuration loading and credential resolution
//!
//! Provides two-tier resolution with ENV → TOML priority for the LLM
//! credential and webhook URL. Absence of either is not an error: the
//! diagnostic service degrades to fallback battlecards (no credential)
//! and skips webhook delivery (no URL).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Environment variable carrying the LLM API credential
pub const ENV_OPENAI_API_KEY: &str = "MONPRO_OPENAI_API_KEY";
/// Environment variable carrying the automation webhook URL
pub const ENV_WEBHOOK_URL: &str = "MONPRO_WEBHOOK_URL";

/// TOML configuration file contents (monpro-dq.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// LLM API credential; fallback battlecards are produced without it
    pub openai_api_key: Option<String>,
    /// Chat model identifier (default: gpt-4o)
    pub openai_model: Option<String>,
    /// Override for the OpenAI-compatible API base URL
    pub openai_base_url: Option<String>,
    /// Automation webhook URL; webhook delivery is skipped without it
    pub webhook_url: Option<String>,
    /// SQLite database path for the vault and cooldown store
    pub database_path: Option<String>,
}

impl TomlConfig {
    /// Load configuration from a TOML file
    ///
    /// Returns the default (all-`None`) configuration when the file does
    /// not exist; a present but unparseable file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
    }
}

/// Resolve the LLM API credential from ENV → TOML
///
/// Returns `None` when unconfigured; the battlecard generator treats that
/// as fallback mode rather than a startup failure.
pub fn resolve_openai_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(ENV_OPENAI_API_KEY).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .openai_api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!("LLM API key found in both environment and TOML. Using environment (highest priority).");
    }

    if let Some(key) = env_key {
        info!("LLM API key loaded from environment variable");
        return Some(key);
    }
    if let Some(key) = toml_key {
        info!("LLM API key loaded from TOML config");
        return Some(key);
    }

    warn!("LLM API key not configured; battlecards will use the fallback path");
    None
}

/// Resolve the automation webhook URL from ENV → TOML
pub fn resolve_webhook_url(toml_config: &TomlConfig) -> Option<String> {
    if let Ok(url) = std::env::var(ENV_WEBHOOK_URL) {
        if is_valid_key(&url) {
            info!("Automation webhook URL loaded from environment variable");
            return Some(url);
        }
    }
    if let Some(url) = toml_config.webhook_url.clone().filter(|u| is_valid_key(u)) {
        info!("Automation webhook URL loaded from TOML config");
        return Some(url);
    }

    warn!("Automation webhook URL not configured; webhook delivery will be skipped");
    None
}

/// Validate a credential or URL (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
