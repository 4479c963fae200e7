//! STT engine interface and error type.

use async_trait::async_trait;
use thiserror::Error;

/// Below this many bytes a clip is well under half a second of speech.
pub const MIN_AUDIO_BYTES: usize = 1024;

// ── Error Handling ─────────────────────────────────────

#[derive(Debug, Error)]
pub enum SttError {
    #[error("Audio too short to transcribe ({0} bytes)")]
    AudioTooShort(usize),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("STT API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("STT provider not found: {0}")]
    ProviderNotFound(String),
}

// ── Engine Trait ───────────────────────────────────────

/// Any speech-to-text backend (OpenAI, faster-whisper-server, ...).
#[async_trait]
pub trait SttEngine: Send + Sync {
    fn id(&self) -> String;

    async fn is_available(&self) -> bool;

    /// Transcribe one encoded clip. `format` is a container hint such as
    /// `wav` or `webm`. Returns trimmed text, possibly empty.
    async fn transcribe(
        &self,
        audio: &[u8],
        format: &str,
        language: Option<&str>,
    ) -> Result<String, SttError>;
}
