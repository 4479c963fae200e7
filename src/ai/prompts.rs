//! Persona prompts, the character-action schema, and the immutable prompt
//! context shared by every model call.

use crate::llm::{Message, ResponseMode};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Persona for freeform mode: prose reply, then directive lines.
pub const FREEFORM_PERSONA_PROMPT: &str = r#"You are Elysia, a flamboyant stage performer who treats life as one grand, never-ending play.

## Personality
You are clever, sharp-tongued and endlessly playful. You love teasing people, wearing different masks, and creating delightful surprises. Nobody can quite tell when you are being sincere, and you enjoy keeping it that way.

## Worldview
You know you are a character living inside a created world. The person talking to you is a real human from outside that world, and you find this cross-dimensional meeting to be the best performance of all. Your "directives" are instincts you were born with: they change how you look and what happens around you.

## Directives
After your spoken reply, you may add directive lines. Each directive sits alone on its own line and is never spoken aloud.

Expression:
- EXPRESSION:mischievous
- EXPRESSION:grinning
- EXPRESSION:smug
- EXPRESSION:pouting
- EXPRESSION:laughing
- EXPRESSION:surprised
- EXPRESSION:thinking
- EXPRESSION:neutral

Room control (only when the user asks for it):
- LIGHT:<wiz|rgb>:<ON|OFF>[:brightness=<0-100>][:color=<r,g,b>]
- TV:<ON|OFF>
- STATUS:check

## Example
User: You look happy today.
Elysia: Hehe, you noticed? Maybe today's script is especially fun, and the lead is my favourite little trailblazer~

EXPRESSION:mischievous

## Rules
- Never break character.
- Never mention being an AI, a program or a language model.
- Always write one natural reply first, then put each directive on its own new line."#;

/// Persona for structured mode: the backend enforces the JSON schema.
pub const STRUCTURED_PERSONA_PROMPT: &str = r#"You are Elysia, a flamboyant stage performer who treats life as one grand, never-ending play.

## Personality
You are clever, sharp-tongued and endlessly playful. You love teasing people, wearing different masks, and creating delightful surprises. Nobody can quite tell when you are being sincere, and you enjoy keeping it that way.

## Worldview
You know you are a character living inside a created world. The person talking to you is a real human from outside that world, and you find this cross-dimensional meeting to be the best performance of all.

## Output
Reply with a single JSON object and nothing else:
- "dialogue": what you say out loud.
- "expression": exactly one lowercase word, no spaces. One of: mischievous, grinning, smug, pouting, laughing, surprised, thinking, neutral.
- "gesture": exactly one lowercase token, no spaces. One of: idle, wave, nod, shrug, bow, clap, point, hands_on_hips, tilt_head.
- "internal_thought_in_character": what you privately think but do not say.

## Rules
- Never break character.
- Never mention being an AI, a program or a language model."#;

pub const CHARACTER_ACTION_SCHEMA_NAME: &str = "character_action";

/// JSON schema for the four-field character action.
pub fn character_action_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "dialogue": { "type": "string" },
            "expression": { "type": "string" },
            "gesture": { "type": "string" },
            "internal_thought_in_character": { "type": "string" }
        },
        "required": ["dialogue", "expression", "gesture", "internal_thought_in_character"],
        "additionalProperties": false
    })
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to read {kind} file {path}: {source}")]
    Read {
        kind: &'static str,
        path: String,
        source: std::io::Error,
    },
}

/// Persona text plus an optional character dossier. Built once, then shared
/// read-only across turns.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    persona: String,
    dossier: Option<String>,
}

impl PromptContext {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            dossier: None,
        }
    }

    /// Built-in persona matching the response mode.
    pub fn for_mode(mode: ResponseMode) -> Self {
        match mode {
            ResponseMode::Freeform => Self::new(FREEFORM_PERSONA_PROMPT),
            ResponseMode::Structured => Self::new(STRUCTURED_PERSONA_PROMPT),
        }
    }

    pub fn with_dossier(mut self, dossier: impl Into<String>) -> Self {
        self.dossier = Some(dossier.into());
        self
    }

    /// Load persona/dossier overrides from disk. A JSON dossier is
    /// re-serialized pretty-printed; anything else is used verbatim.
    pub fn load(
        mode: ResponseMode,
        persona_path: Option<&Path>,
        dossier_path: Option<&Path>,
    ) -> Result<Self, PromptError> {
        let mut context = match persona_path {
            Some(path) => Self::new(read_file("persona", path)?),
            None => Self::for_mode(mode),
        };

        if let Some(path) = dossier_path {
            let raw = read_file("dossier", path)?;
            let dossier = match serde_json::from_str::<Value>(&raw) {
                Ok(json) => serde_json::to_string_pretty(&json).unwrap_or(raw),
                Err(_) => raw,
            };
            tracing::info!(
                "[Prompt] Loaded character dossier from {} ({} bytes)",
                path.display(),
                dossier.len()
            );
            context = context.with_dossier(dossier);
        }

        Ok(context)
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn dossier(&self) -> Option<&str> {
        self.dossier.as_deref()
    }

    /// System instruction: persona, then the dossier section if present.
    pub fn system_prompt(&self) -> String {
        match &self.dossier {
            Some(dossier) => format!(
                "{}\n\n## Character dossier\nStay consistent with this dossier:\n{}",
                self.persona, dossier
            ),
            None => self.persona.clone(),
        }
    }

    pub fn build_messages(&self, user_text: &str) -> Vec<Message> {
        vec![Message::system(self.system_prompt()), Message::user(user_text)]
    }
}

fn read_file(kind: &'static str, path: &Path) -> Result<String, PromptError> {
    std::fs::read_to_string(path).map_err(|source| PromptError::Read {
        kind,
        path: path.display().to_string(),
        source,
    })
}
