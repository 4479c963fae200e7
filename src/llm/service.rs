//! Provider factory: builds the active LLM backend from config.

use crate::llm::llm_config::{LlmConfig, LlmProviderConfig};
use crate::llm::ollama::{OllamaProvider, DEFAULT_OLLAMA_MODEL};
use crate::llm::openai::OpenAIProvider;
use crate::llm::provider::LlmProvider;
use crate::utils::http::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;

/// Build the provider selected by `active_provider`, falling back to the
/// first enabled one, then the first listed, then a default Ollama.
pub fn build_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    let active_id = &config.active_provider;
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let retry = RetryPolicy::new(config.max_retries);

    let provider_cfg = config
        .providers
        .iter()
        .find(|p| p.id == *active_id)
        .or_else(|| config.providers.iter().find(|p| p.enabled))
        .or_else(|| config.providers.first());

    match provider_cfg {
        Some(cfg) => build_from_provider_config(cfg, timeout, retry),
        None => {
            tracing::warn!("[LLM] No provider configured, falling back to local Ollama defaults");
            Arc::new(
                OllamaProvider::new(None, DEFAULT_OLLAMA_MODEL.to_string(), timeout)
                    .with_retry(retry),
            )
        }
    }
}

fn build_from_provider_config(
    cfg: &LlmProviderConfig,
    timeout: Duration,
    retry: RetryPolicy,
) -> Arc<dyn LlmProvider> {
    match cfg.provider_type.as_str() {
        "ollama" => {
            let model = cfg
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
            tracing::info!("[LLM] Initializing Ollama provider: model={}", model);
            Arc::new(OllamaProvider::new(cfg.base_url.clone(), model, timeout).with_retry(retry))
        }
        other => {
            if other != "openai" {
                tracing::warn!(
                    "[LLM] Unknown provider type '{}', treating as OpenAI-compatible",
                    other
                );
            }
            let api_key = cfg.resolve_api_key().unwrap_or_default();
            if api_key.is_empty() {
                tracing::warn!("[LLM] Provider '{}' has no API key configured", cfg.id);
            }
            tracing::info!(
                "[LLM] Initializing OpenAI-compatible provider: base_url={}, model={}",
                cfg.base_url.as_deref().unwrap_or("https://api.openai.com/v1"),
                cfg.model.as_deref().unwrap_or("<default>")
            );
            Arc::new(
                OpenAIProvider::new(api_key, cfg.base_url.clone(), cfg.model.clone(), timeout)
                    .with_id(cfg.id.clone())
                    .with_retry(retry),
            )
        }
    }
}
