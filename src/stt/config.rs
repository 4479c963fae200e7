//! STT configuration, persisted to `stt_config.json`.

use crate::config::{self, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttProviderConfig {
    pub id: String,
    /// "openai_whisper" | "faster_whisper" | "whisper_cpp"; all speak the
    /// OpenAI transcription API.
    pub provider_type: String,
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Direct API key (takes precedence over env var)
    pub api_key: Option<String>,
    /// Environment variable name to read API key from
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    /// Model name (e.g., "whisper-1")
    pub model: Option<String>,
}

impl SttProviderConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        config::resolve_api_key(&self.api_key, &self.api_key_env)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttConfig {
    /// ID of the active STT provider
    #[serde(default = "default_active_provider")]
    pub active_provider: String,

    /// Optional language hint ("zh", "en", "ja", ...)
    #[serde(default)]
    pub language: Option<String>,

    /// Container format of inbound `audio_data` clips.
    #[serde(default = "default_audio_format")]
    pub audio_format: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_providers")]
    pub providers: Vec<SttProviderConfig>,
}

fn default_active_provider() -> String {
    "openai_whisper".to_string()
}

fn default_audio_format() -> String {
    "wav".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_providers() -> Vec<SttProviderConfig> {
    vec![
        SttProviderConfig {
            id: "openai_whisper".to_string(),
            provider_type: "openai_whisper".to_string(),
            enabled: true,
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
            base_url: Some("https://api.openai.com/v1".to_string()),
            model: Some("whisper-1".to_string()),
        },
        SttProviderConfig {
            id: "faster_whisper".to_string(),
            provider_type: "faster_whisper".to_string(),
            enabled: false,
            api_key: None,
            api_key_env: None,
            base_url: Some("http://127.0.0.1:8000/v1".to_string()),
            model: Some("medium".to_string()),
        },
    ]
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            active_provider: default_active_provider(),
            language: None,
            audio_format: default_audio_format(),
            timeout_secs: default_timeout_secs(),
            providers: default_providers(),
        }
    }
}

pub fn load_config(path: &Path) -> SttConfig {
    config::load_json_config(path, "STT")
}

pub fn save_config(path: &Path, config: &SttConfig) -> Result<(), ConfigError> {
    config::save_json_config(path, config, "STT")
}
