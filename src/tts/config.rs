//! Speech synthesis configuration, persisted to `tts_config.json`.

use crate::config::{self, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Loaded via `/set_gpt_weights` before each synthesis when set.
    #[serde(default)]
    pub gpt_weights: Option<String>,
    #[serde(default)]
    pub sovits_weights: Option<String>,

    /// Reference clip and its transcript, paths as seen by the server.
    #[serde(default)]
    pub ref_audio_path: Option<String>,
    #[serde(default)]
    pub prompt_text: Option<String>,

    #[serde(default = "default_lang")]
    pub prompt_lang: String,
    #[serde(default = "default_lang")]
    pub text_lang: String,

    #[serde(default = "default_text_split_method")]
    pub text_split_method: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Latest synthesized clip is also written here when set.
    #[serde(default)]
    pub output_path: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://127.0.0.1:9880".to_string()
}

fn default_lang() -> String {
    "zh".to_string()
}

fn default_text_split_method() -> String {
    "cut5".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            gpt_weights: None,
            sovits_weights: None,
            ref_audio_path: None,
            prompt_text: None,
            prompt_lang: default_lang(),
            text_lang: default_lang(),
            text_split_method: default_text_split_method(),
            timeout_secs: default_timeout_secs(),
            output_path: None,
        }
    }
}

pub fn load_config(path: &Path) -> TtsConfig {
    config::load_json_config(path, "TTS")
}

pub fn save_config(path: &Path, config: &TtsConfig) -> Result<(), ConfigError> {
    config::save_json_config(path, config, "TTS")
}
