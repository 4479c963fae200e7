//! OpenAI-compatible Whisper STT provider.
//!
//! Posts to `{base}/audio/transcriptions`, which OpenAI, faster-whisper-server
//! and whisper.cpp's server (with the OpenAI inference path) all accept.

use super::interface::{SttEngine, SttError, MIN_AUDIO_BYTES};
use async_trait::async_trait;
use reqwest::{multipart, Client};
use std::time::Duration;

pub const DEFAULT_WHISPER_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";

pub struct OpenAIWhisperProvider {
    client: Client,
    provider_id: String,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIWhisperProvider {
    pub fn new(
        provider_id: String,
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            provider_id,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_WHISPER_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string()),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

/// Map an audio format hint to an extension Whisper accepts.
fn format_to_extension(format: &str) -> &'static str {
    match format.to_lowercase().as_str() {
        "webm" => "webm",
        "wav" | "wave" => "wav",
        "mp3" | "mpeg" => "mp3",
        "mp4" | "m4a" => "m4a",
        "ogg" | "oga" => "ogg",
        "flac" => "flac",
        _ => "wav",
    }
}

#[async_trait]
impl SttEngine for OpenAIWhisperProvider {
    fn id(&self) -> String {
        self.provider_id.clone()
    }

    async fn is_available(&self) -> bool {
        // Local servers accept an empty key; hosted OpenAI does not.
        !self.api_key.is_empty() || !self.base_url.starts_with(DEFAULT_WHISPER_URL)
    }

    async fn transcribe(
        &self,
        audio: &[u8],
        format: &str,
        language: Option<&str>,
    ) -> Result<String, SttError> {
        if audio.len() < MIN_AUDIO_BYTES {
            return Err(SttError::AudioTooShort(audio.len()));
        }

        let ext = format_to_extension(format);
        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name(format!("audio.{}", ext))
            .mime_str(&format!("audio/{}", ext))
            .map_err(|e| SttError::TranscriptionFailed(format!("MIME error: {}", e)))?;

        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "text");

        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let url = format!("{}/audio/transcriptions", self.base_url.trim_end_matches('/'));
        tracing::debug!("[STT/{}] POST {} ({} bytes {})", self.provider_id, url, audio.len(), ext);

        let mut request = self.client.post(&url).multipart(form);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SttError::TranscriptionFailed(format!("HTTP error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(SttError::Api { status, body });
        }

        let text = response.text().await.map_err(|e| {
            SttError::TranscriptionFailed(format!("Failed to read response: {}", e))
        })?;

        Ok(text.trim().to_string())
    }
}
