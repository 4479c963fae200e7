//! STT Service: builds the configured providers and routes transcription to
//! the active one.

use super::config::{SttConfig, SttProviderConfig};
use super::interface::{SttEngine, SttError};
use super::openai::OpenAIWhisperProvider;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct SttService {
    providers: Vec<Arc<dyn SttEngine>>,
    active_provider: String,
    language: Option<String>,
}

impl SttService {
    /// Build every enabled provider from config.
    pub fn from_config(config: &SttConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let providers: Vec<Arc<dyn SttEngine>> = config
            .providers
            .iter()
            .filter(|p| p.enabled)
            .filter_map(|p| Self::build_provider(p, timeout))
            .collect();

        tracing::info!("[STT] Initialized with {} provider(s)", providers.len());
        Self {
            providers,
            active_provider: config.active_provider.clone(),
            language: config.language.clone(),
        }
    }

    /// Single pre-built engine, e.g. a fake in tests.
    pub fn with_engine(engine: Arc<dyn SttEngine>, language: Option<String>) -> Self {
        Self {
            active_provider: engine.id(),
            providers: vec![engine],
            language,
        }
    }

    fn build_provider(config: &SttProviderConfig, timeout: Duration) -> Option<Arc<dyn SttEngine>> {
        match config.provider_type.as_str() {
            "openai_whisper" | "faster_whisper" | "whisper_cpp" => {
                // Local servers run without a key.
                let api_key = config.resolve_api_key().unwrap_or_default();
                Some(Arc::new(OpenAIWhisperProvider::new(
                    config.id.clone(),
                    api_key,
                    config.base_url.clone(),
                    config.model.clone(),
                    timeout,
                )))
            }
            other => {
                tracing::warn!("[STT] Unknown provider type: {}", other);
                None
            }
        }
    }

    pub fn active(&self) -> Option<&Arc<dyn SttEngine>> {
        self.providers
            .iter()
            .find(|p| p.id() == self.active_provider)
            .or_else(|| self.providers.first())
    }

    /// Transcribe with the active provider, falling back to the first one.
    pub async fn transcribe(&self, audio: &[u8], format: &str) -> Result<String, SttError> {
        let provider = self
            .active()
            .ok_or_else(|| SttError::ProviderNotFound("No STT providers configured".to_string()))?;
        provider
            .transcribe(audio, format, self.language.as_deref())
            .await
    }
}
