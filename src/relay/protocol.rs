//! Relay wire format.
//!
//! Inbound (rendering client -> relay):
//! ```json
//! {"event": "audio_data", "data": "<base64 audio clip>"}
//! {"event": "text_input", "data": "typed utterance"}
//! ```
//! Outbound (relay -> rendering client), one per turn:
//! ```json
//! {"dialogue": "...", "expression": "smug", "gesture": "wave",
//!  "internal_thought_in_character": "...", "audio_base64": "UklGR..."}
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::ai::CharacterAction;

pub const AUDIO_DATA_EVENT: &str = "audio_data";
pub const TEXT_INPUT_EVENT: &str = "text_input";

#[derive(Debug, Clone, Deserialize)]
struct InboundEnvelope {
    event: String,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    AudioData(Vec<u8>),
    TextInput(String),
}

/// Why an inbound frame was dropped.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
    #[error("audio payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl InboundEvent {
    pub fn decode(frame: &str) -> Result<Self, DecodeError> {
        let envelope: InboundEnvelope = serde_json::from_str(frame)?;
        match envelope.event.as_str() {
            AUDIO_DATA_EVENT => Ok(InboundEvent::AudioData(BASE64.decode(envelope.data.trim())?)),
            TEXT_INPUT_EVENT => Ok(InboundEvent::TextInput(envelope.data)),
            _ => Err(DecodeError::UnknownEvent(envelope.event)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub dialogue: String,
    pub expression: String,
    pub gesture: String,
    pub internal_thought_in_character: String,
    /// Empty when synthesis failed or was skipped.
    pub audio_base64: String,
}

impl OutboundMessage {
    pub fn new(action: CharacterAction, audio: Option<&[u8]>) -> Self {
        Self {
            dialogue: action.dialogue,
            expression: action.expression,
            gesture: action.gesture,
            internal_thought_in_character: action.internal_thought,
            audio_base64: audio.map(|bytes| BASE64.encode(bytes)).unwrap_or_default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
