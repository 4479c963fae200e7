//! One inbound relay event -> one outbound character message.
//!
//! audio_data: decode -> transcribe -> turn -> synthesize
//! text_input: turn -> synthesize

use std::sync::Arc;

use crate::ai::{CharacterAction, FreeformTurn, TurnOrchestrator, TurnOutcome};
use crate::relay::protocol::{DecodeError, InboundEvent, OutboundMessage};
use crate::stt::SttService;
use crate::tts::TtsProvider;

const FREEFORM_GESTURE: &str = "idle";
const FREEFORM_EXPRESSION: &str = "neutral";

/// Shared by every connection. Holds no per-turn state.
pub struct RelaySession {
    stt: SttService,
    orchestrator: Arc<TurnOrchestrator>,
    tts: Option<Arc<dyn TtsProvider>>,
    audio_format: String,
}

impl RelaySession {
    pub fn new(
        stt: SttService,
        orchestrator: Arc<TurnOrchestrator>,
        tts: Option<Arc<dyn TtsProvider>>,
        audio_format: impl Into<String>,
    ) -> Self {
        Self {
            stt,
            orchestrator,
            tts,
            audio_format: audio_format.into(),
        }
    }

    /// `None` when the frame was dropped (bad JSON, unknown event). Audio that
    /// fails to decode is answered with the unheard sentinel.
    pub async fn handle_frame(&self, frame: &str) -> Option<OutboundMessage> {
        match InboundEvent::decode(frame) {
            Ok(event) => Some(self.handle_event(event).await),
            Err(e @ DecodeError::Base64(_)) => {
                tracing::warn!("[Relay] Undecodable audio frame: {}", e);
                Some(self.reply(CharacterAction::unheard(e)).await)
            }
            Err(e) => {
                tracing::warn!("[Relay] Dropping inbound frame: {}", e);
                None
            }
        }
    }

    pub async fn handle_event(&self, event: InboundEvent) -> OutboundMessage {
        let action = match event {
            InboundEvent::AudioData(audio) => {
                tracing::info!("[Relay] Received {} bytes of audio", audio.len());
                match self.transcribe(&audio).await {
                    Ok(text) => self.run_turn(&text).await,
                    Err(unheard) => unheard,
                }
            }
            InboundEvent::TextInput(text) => {
                let text = text.trim();
                if text.is_empty() {
                    CharacterAction::unheard("text input was empty")
                } else {
                    self.run_turn(text).await
                }
            }
        };

        self.reply(action).await
    }

    async fn reply(&self, action: CharacterAction) -> OutboundMessage {
        let audio = self.synthesize(&action).await;
        OutboundMessage::new(action, audio.as_deref())
    }

    /// Transcript, or the sentinel to answer with instead of calling the model.
    async fn transcribe(&self, audio: &[u8]) -> Result<String, CharacterAction> {
        match self.stt.transcribe(audio, &self.audio_format).await {
            Ok(text) if !text.is_empty() => {
                tracing::info!("[Relay] Heard: {}", text);
                Ok(text)
            }
            Ok(_) => {
                tracing::info!("[Relay] Transcription was empty");
                Err(CharacterAction::unheard("speech recognition returned no text"))
            }
            Err(e) => {
                tracing::warn!("[Relay] Speech recognition failed: {}", e);
                Err(CharacterAction::unheard(e))
            }
        }
    }

    async fn run_turn(&self, text: &str) -> CharacterAction {
        match self.orchestrator.run_turn(text).await {
            TurnOutcome::Structured(action) => action,
            TurnOutcome::Freeform(turn) => action_from_freeform(turn),
        }
    }

    async fn synthesize(&self, action: &CharacterAction) -> Option<Vec<u8>> {
        let tts = self.tts.as_ref()?;
        if action.is_api_failure() {
            tracing::info!("[Relay] Skipping speech for API failure reply");
            return None;
        }
        match tts.synthesize(&action.dialogue).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                tracing::warn!("[Relay] Speech synthesis via {} failed: {}", tts.id(), e);
                None
            }
        }
    }
}

/// Freeform turns carry prose plus a dispatch summary; fold them into the
/// four-field shape the rendering client expects.
pub fn action_from_freeform(turn: FreeformTurn) -> CharacterAction {
    let dialogue = if turn.reply.is_empty() {
        turn.summary.clone()
    } else {
        turn.reply
    };
    CharacterAction {
        dialogue,
        expression: turn
            .expression
            .unwrap_or_else(|| FREEFORM_EXPRESSION.to_string()),
        gesture: FREEFORM_GESTURE.to_string(),
        internal_thought: turn.summary,
    }
}
