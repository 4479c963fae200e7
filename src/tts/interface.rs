use async_trait::async_trait;
use thiserror::Error;

// ── Error Types ────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Nothing to synthesize: text is empty")]
    EmptyText,

    #[error("Failed to load {kind} weights ({status}): {body}")]
    WeightSwitch {
        kind: &'static str,
        status: u16,
        body: String,
    },

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("TTS unavailable: {0}")]
    Unavailable(String),
}

// ── Provider Trait ─────────────────────────────────────

#[async_trait]
pub trait TtsProvider: Send + Sync {
    fn id(&self) -> String;

    /// Reachability probe; used for a startup warning only.
    async fn is_available(&self) -> bool;

    /// Synthesize `text` into encoded audio bytes (WAV for GPT-SoVITS).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError>;
}
