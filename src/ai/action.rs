//! Character action: the normalized four-field result of one turn, plus the
//! parser that turns raw structured-mode model output into one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MISSING_DIALOGUE: &str = "Error: Missing dialogue.";
pub const DEFAULT_EXPRESSION: &str = "neutral";
pub const DEFAULT_GESTURE: &str = "idle";
pub const MISSING_THOUGHT: &str = "Error: Missing thought.";

pub const API_FAILURE_DIALOGUE: &str =
    "API call failed. Please check the connection to the language model.";
const API_FAILURE_EXPRESSION: &str = "distressed";
const API_FAILURE_GESTURE: &str = "sleeping";
const API_FAILURE_THOUGHT: &str = "Error: No response received from the model.";

const PARSE_FAILURE_DIALOGUE: &str =
    "Sorry, my thoughts got a little tangled. Could you say that again?";
const PARSE_FAILURE_EXPRESSION: &str = "pouting";

const UNHEARD_DIALOGUE: &str = "Sorry, I didn't quite catch that.";
const UNHEARD_EXPRESSION: &str = "confused";
const UNHEARD_GESTURE: &str = "tilt_head";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterAction {
    pub dialogue: String,
    pub expression: String,
    pub gesture: String,
    #[serde(rename = "internal_thought_in_character")]
    pub internal_thought: String,
}

impl CharacterAction {
    pub fn new(
        dialogue: impl Into<String>,
        expression: impl Into<String>,
        gesture: impl Into<String>,
        internal_thought: impl Into<String>,
    ) -> Self {
        Self {
            dialogue: dialogue.into(),
            expression: expression.into(),
            gesture: gesture.into(),
            internal_thought: internal_thought.into(),
        }
    }

    /// The model produced nothing (network failure, timeout, empty reply).
    pub fn api_failure() -> Self {
        Self::new(
            API_FAILURE_DIALOGUE,
            API_FAILURE_EXPRESSION,
            API_FAILURE_GESTURE,
            API_FAILURE_THOUGHT,
        )
    }

    /// The model replied, but not with a usable JSON object.
    pub fn parse_failure(detail: impl std::fmt::Display) -> Self {
        Self::new(
            PARSE_FAILURE_DIALOGUE,
            PARSE_FAILURE_EXPRESSION,
            DEFAULT_GESTURE,
            format!("Error: Could not parse the model response: {}", detail),
        )
    }

    /// Speech recognition failed or heard nothing; the model is never called.
    pub fn unheard(detail: impl std::fmt::Display) -> Self {
        Self::new(
            UNHEARD_DIALOGUE,
            UNHEARD_EXPRESSION,
            UNHEARD_GESTURE,
            format!("Error: {}", detail),
        )
    }

    /// The turn itself blew up. Same face as an API failure, with the cause
    /// kept in the thought.
    pub fn internal_error(detail: impl std::fmt::Display) -> Self {
        Self {
            internal_thought: format!("Error processing request: {}", detail),
            ..Self::api_failure()
        }
    }

    /// No point synthesizing speech for the API failure line.
    pub fn is_api_failure(&self) -> bool {
        self.dialogue == API_FAILURE_DIALOGUE
    }
}

/// Parse raw structured-mode output. Total: every input maps to an action.
pub fn parse_action(raw: Option<&str>) -> CharacterAction {
    let Some(raw) = raw else {
        tracing::warn!("[Action] No model output, using failure sentinel");
        return CharacterAction::api_failure();
    };

    let body = strip_code_fence(raw);
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => from_object(&map),
        Ok(other) => {
            tracing::warn!("[Action] Model returned JSON {} instead of an object", json_kind(&other));
            CharacterAction::parse_failure(format!("expected a JSON object, got {}", json_kind(&other)))
        }
        Err(e) => {
            tracing::warn!("[Action] Model output is not valid JSON: {}", e);
            CharacterAction::parse_failure(e)
        }
    }
}

fn from_object(map: &Map<String, Value>) -> CharacterAction {
    let action = CharacterAction {
        dialogue: string_field(map, "dialogue", MISSING_DIALOGUE),
        expression: string_field(map, "expression", DEFAULT_EXPRESSION),
        gesture: string_field(map, "gesture", DEFAULT_GESTURE),
        internal_thought: string_field(map, "internal_thought_in_character", MISSING_THOUGHT),
    };

    // Tags are passed through as-is; the schema is trusted to keep them single-token.
    for (name, tag) in [("expression", &action.expression), ("gesture", &action.gesture)] {
        if tag.chars().any(char::is_whitespace) {
            tracing::warn!("[Action] {} tag {:?} is not a single token", name, tag);
        }
    }

    action
}

fn string_field(map: &Map<String, Value>, key: &str, default: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            tracing::debug!(
                "[Action] Field '{}' is {} not a string, defaulting to {:?}",
                key,
                json_kind(other),
                default
            );
            default.to_string()
        }
        None => {
            tracing::debug!("[Action] Field '{}' missing, defaulting to {:?}", key, default);
            default.to_string()
        }
    }
}

/// Drop a surrounding Markdown fence (```` ```json ... ``` ````) if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
