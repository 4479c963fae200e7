//! LLM configuration: persisted to `llm_config.json`.

use crate::config::{self, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which response contract the model is held to. Selected once per
/// configuration, never mixed within a turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Plain-text reply followed by `PREFIX:rest` marker lines.
    Freeform,
    /// JSON object matching the four-field character action schema.
    #[default]
    Structured,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    pub id: String,
    /// "openai" | "ollama"
    pub provider_type: String,
    #[serde(default = "default_true")]
    pub enabled: bool,

    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl LlmProviderConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        config::resolve_api_key(&self.api_key, &self.api_key_env)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// ID of the active provider (must match one of `providers[].id`).
    #[serde(default = "default_active_provider")]
    pub active_provider: String,

    #[serde(default = "default_providers")]
    pub providers: Vec<LlmProviderConfig>,

    #[serde(default)]
    pub response_mode: ResponseMode,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: Option<u32>,

    /// Retries for transient backend failures (429 / 5xx / network).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-HTTP-request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_active_provider() -> String {
    "ollama".to_string()
}

fn default_max_tokens() -> Option<u32> {
    Some(1024)
}

fn default_max_retries() -> u32 {
    2
}

fn default_request_timeout_secs() -> u64 {
    90
}

fn default_providers() -> Vec<LlmProviderConfig> {
    vec![
        LlmProviderConfig {
            id: "ollama".to_string(),
            provider_type: "ollama".to_string(),
            enabled: true,
            api_key: None,
            api_key_env: None,
            base_url: Some("http://localhost:11434".to_string()),
            model: Some("llama3.1:8b".to_string()),
        },
        LlmProviderConfig {
            id: "openai".to_string(),
            provider_type: "openai".to_string(),
            enabled: false,
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            base_url: Some("https://api.openai.com/v1".to_string()),
            model: Some("gpt-4o-mini".to_string()),
        },
    ]
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            active_provider: default_active_provider(),
            providers: default_providers(),
            response_mode: ResponseMode::default(),
            temperature: None,
            max_tokens: default_max_tokens(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

pub fn load_config(path: &Path) -> LlmConfig {
    config::load_json_config(path, "LLM")
}

pub fn save_config(path: &Path, config: &LlmConfig) -> Result<(), ConfigError> {
    config::save_json_config(path, config, "LLM")
}
