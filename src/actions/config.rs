//! Environment-control configuration (the `environment` block of
//! `relay_config.json`) and the collaborator factory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::actions::home_assistant::HomeAssistantControl;
use crate::actions::interface::EnvironmentControl;
use crate::actions::mock::MockEnvironment;
use crate::config;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// "mock" | "home_assistant"
    #[serde(default = "default_provider_type")]
    pub provider_type: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Directive light name -> Home Assistant entity id. Unlisted names map
    /// to `light.<name>`.
    #[serde(default)]
    pub light_entities: BTreeMap<String, String>,
    #[serde(default = "default_tv_entity")]
    pub tv_entity: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_type() -> String {
    "mock".to_string()
}

fn default_tv_entity() -> String {
    "media_player.tv".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            base_url: None,
            api_key: None,
            api_key_env: None,
            light_entities: BTreeMap::new(),
            tv_entity: default_tv_entity(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EnvironmentConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        config::resolve_api_key(&self.api_key, &self.api_key_env)
    }
}

/// Home Assistant needs a base URL and a token; anything less falls back to
/// the log-only mock.
pub fn build_environment(cfg: &EnvironmentConfig) -> Arc<dyn EnvironmentControl> {
    match cfg.provider_type.as_str() {
        "home_assistant" => match (cfg.base_url.clone(), cfg.resolve_api_key()) {
            (Some(base_url), Some(token)) => {
                tracing::info!("[Actions] Using Home Assistant at {}", base_url);
                Arc::new(HomeAssistantControl::new(
                    base_url,
                    token,
                    cfg.light_entities.clone(),
                    cfg.tv_entity.clone(),
                    Duration::from_secs(cfg.timeout_secs),
                ))
            }
            _ => {
                tracing::warn!(
                    "[Actions] Home Assistant needs base_url and a token, using mock environment"
                );
                Arc::new(MockEnvironment)
            }
        },
        "mock" => Arc::new(MockEnvironment),
        other => {
            tracing::warn!("[Actions] Unknown environment provider '{}', using mock", other);
            Arc::new(MockEnvironment)
        }
    }
}
