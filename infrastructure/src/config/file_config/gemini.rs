//! Gemini API configuration from TOML (`[gemini]` section)

use crate::gemini::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw Gemini configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Base URL up to the API version
    pub api_base: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Direct API key (prefer `api_key_env`)
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_base: crate::gemini::DEFAULT_API_BASE.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            timeout_seconds: 120,
        }
    }
}

impl FileGeminiConfig {
    /// API key from the config file, falling back to `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Build client settings with the given key
    pub fn to_client_config(&self, api_key: String) -> GeminiConfig {
        GeminiConfig::new(api_key)
            .with_api_base(self.api_base.clone())
            .with_timeout(Duration::from_secs(self.timeout_seconds))
    }
}
