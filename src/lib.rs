pub mod actions;
pub mod ai;
pub mod config;
pub mod llm;
pub mod relay;
pub mod stt;
pub mod tts;
pub mod utils;

#[cfg(test)]
mod test_support;

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

use crate::actions::LoggingAvatar;
use crate::ai::{CommandDispatcher, ModelClient, PromptContext, TurnOrchestrator};
use crate::config::{LLM_CONFIG_FILE, STT_CONFIG_FILE, TTS_CONFIG_FILE};
use crate::llm::LlmParams;
use crate::relay::{RelayConfig, RelaySession};
use crate::stt::SttService;
use crate::tts::{GptSovitsProvider, TtsProvider};

/// Wire every collaborator from the JSON files in `config_dir`.
pub async fn build_session(config_dir: &Path, relay_config: &RelayConfig) -> anyhow::Result<RelaySession> {
    let llm_config = llm::load_config(&config_dir.join(LLM_CONFIG_FILE));
    let stt_config = stt::load_config(&config_dir.join(STT_CONFIG_FILE));
    let tts_config = tts::load_config(&config_dir.join(TTS_CONFIG_FILE));

    let mode = llm_config.response_mode;
    let context = PromptContext::load(
        mode,
        relay_config.persona_path.as_deref(),
        relay_config.dossier_path.as_deref(),
    )
    .context("failed to load persona")?;

    let provider = llm::build_provider(&llm_config);
    tracing::info!("[LLM] Provider '{}' in {:?} mode", provider.id(), mode);
    let client = ModelClient::new(
        provider,
        Arc::new(context),
        mode,
        LlmParams {
            temperature: llm_config.temperature,
            max_tokens: llm_config.max_tokens,
        },
    );

    let environment = actions::build_environment(&relay_config.environment);
    let orchestrator = TurnOrchestrator::new(
        client,
        CommandDispatcher::new(environment, Arc::new(LoggingAvatar)),
    )
    .with_turn_timeout(relay_config.turn_timeout())
    .with_dispatch_pacing(relay_config.dispatch_pacing());

    let tts: Option<Arc<dyn TtsProvider>> = if tts_config.enabled {
        let provider = GptSovitsProvider::from_config(&tts_config);
        if !provider.is_available().await {
            tracing::warn!(
                "[TTS] GPT-SoVITS at {} is not reachable yet; replies will carry no audio until it is",
                tts_config.base_url
            );
        }
        Some(Arc::new(provider))
    } else {
        tracing::info!("[TTS] Speech synthesis disabled");
        None
    };

    Ok(RelaySession::new(
        SttService::from_config(&stt_config),
        Arc::new(orchestrator),
        tts,
        stt_config.audio_format,
    ))
}
