use super::config::TtsConfig;
use super::interface::{TtsError, TtsProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Local GPT-SoVITS provider, talking to RVC-Boss/GPT-SoVITS `api_v2.py`.
///
/// Endpoints used:
///   GET  /set_gpt_weights   : switch GPT model
///   GET  /set_sovits_weights: switch SoVITS model
///   POST /tts                : synthesis
pub struct GptSovitsProvider {
    client: Client,
    base_url: String,
    gpt_weights: Option<String>,
    sovits_weights: Option<String>,
    ref_audio_path: Option<String>,
    prompt_text: Option<String>,
    prompt_lang: String,
    text_lang: String,
    text_split_method: String,
    output_path: Option<String>,
}

#[derive(Serialize)]
struct GptSovitsRequest<'a> {
    text: &'a str,
    text_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ref_audio_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_text: Option<&'a str>,
    prompt_lang: &'a str,
    text_split_method: &'a str,
}

impl GptSovitsProvider {
    pub fn from_config(config: &TtsConfig) -> Self {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            gpt_weights: non_empty(&config.gpt_weights),
            sovits_weights: non_empty(&config.sovits_weights),
            ref_audio_path: non_empty(&config.ref_audio_path),
            prompt_text: non_empty(&config.prompt_text),
            prompt_lang: config.prompt_lang.clone(),
            text_lang: config.text_lang.clone(),
            text_split_method: config.text_split_method.clone(),
            output_path: non_empty(&config.output_path),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Server handles repeated loads of the same weights idempotently.
    async fn set_weights(&self, kind: &'static str, weights_path: &str) -> Result<(), TtsError> {
        let url = format!("{}/set_{}_weights", self.base_url, kind);
        let response = self
            .client
            .get(&url)
            .query(&[("weights_path", weights_path)])
            .send()
            .await
            .map_err(|e| TtsError::Unavailable(format!("GPT-SoVITS {} weights request failed: {}", kind, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::WeightSwitch {
                kind,
                status: status.as_u16(),
                body,
            });
        }
        tracing::debug!("[TTS/GPT-SoVITS] {} weights set to {}", kind, weights_path);
        Ok(())
    }
}

#[async_trait]
impl TtsProvider for GptSovitsProvider {
    fn id(&self) -> String {
        "gpt_sovits".to_string()
    }

    async fn is_available(&self) -> bool {
        // A running api_v2.py answers /tts even without params (400).
        self.client
            .get(format!("{}/tts", self.base_url))
            .timeout(Duration::from_secs(3))
            .send()
            .await
            .is_ok()
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        if let Some(gpt) = &self.gpt_weights {
            self.set_weights("gpt", gpt).await?;
        }
        if let Some(sovits) = &self.sovits_weights {
            self.set_weights("sovits", sovits).await?;
        }

        let body = GptSovitsRequest {
            text,
            text_lang: &self.text_lang,
            ref_audio_path: self.ref_audio_path.as_deref(),
            prompt_text: self.prompt_text.as_deref(),
            prompt_lang: &self.prompt_lang,
            text_split_method: &self.text_split_method,
        };

        let response = self
            .client
            .post(format!("{}/tts", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsError::SynthesisFailed(format!("GPT-SoVITS request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TtsError::SynthesisFailed(format!(
                "GPT-SoVITS server error ({}): {}",
                status, error_text
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::SynthesisFailed(format!("GPT-SoVITS bytes error: {}", e)))?
            .to_vec();

        tracing::info!("[TTS/GPT-SoVITS] Synthesized {} bytes", bytes.len());

        if let Some(path) = &self.output_path {
            if let Err(e) = tokio::fs::write(path, &bytes).await {
                tracing::warn!("[TTS/GPT-SoVITS] Could not write audio to {}: {}", path, e);
            }
        }

        Ok(bytes)
    }
}
