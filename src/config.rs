//! Shared config utilities for loading/saving the per-subsystem JSON files,
//! resolving the config directory, and resolving API keys from fields or
//! environment variables.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "ELYSIA_CONFIG_DIR";

pub const LLM_CONFIG_FILE: &str = "llm_config.json";
pub const TTS_CONFIG_FILE: &str = "tts_config.json";
pub const STT_CONFIG_FILE: &str = "stt_config.json";
pub const RELAY_CONFIG_FILE: &str = "relay_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(config) => {
                tracing::info!("[{}] Loaded config from {}", label, path.display());
                config
            }
            Err(e) => {
                tracing::warn!(
                    "[{}] Failed to parse config {}: {}, using defaults",
                    label,
                    path.display(),
                    e
                );
                T::default()
            }
        },
        Err(_) => {
            tracing::info!(
                "[{}] No config file at {}, using defaults",
                label,
                path.display()
            );
            T::default()
        }
    }
}

/// Generic save for any Serde config type.
pub fn save_json_config<T: Serialize>(
    path: &Path,
    config: &T,
    label: &str,
) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("[{}] Saved config to {}", label, path.display());
    Ok(())
}

/// Resolve an API key: check the direct `api_key` field first,
/// then fall back to reading the environment variable named in `api_key_env`.
pub fn resolve_api_key(api_key: &Option<String>, api_key_env: &Option<String>) -> Option<String> {
    if let Some(ref key) = api_key {
        if !key.is_empty() {
            return Some(key.clone());
        }
    }
    if let Some(ref env_var) = api_key_env {
        if let Ok(key) = std::env::var(env_var) {
            if !key.is_empty() {
                return Some(key);
            }
        }
    }
    None
}

/// Pick the config directory: explicit argument, then `ELYSIA_CONFIG_DIR`,
/// then `<platform config dir>/elysia-relay`, then `./config`.
///
/// Returns the directory and a short label describing where it came from.
pub fn resolve_config_dir(cli_arg: Option<String>) -> (PathBuf, &'static str) {
    if let Some(dir) = cli_arg.filter(|value| !value.trim().is_empty()) {
        return (PathBuf::from(dir), "cli-arg");
    }

    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.trim().is_empty() {
            return (PathBuf::from(dir), "env-var");
        }
    }

    match dirs_next::config_dir() {
        Some(base) => (base.join("elysia-relay"), "platform"),
        None => (PathBuf::from("config"), "default"),
    }
}
