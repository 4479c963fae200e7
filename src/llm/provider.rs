//! LLM Provider trait: common interface for all LLM backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ── Messages ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// ── Request ────────────────────────────────────────────

/// What shape of output the backend is asked to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Plain text, free to contain marker lines.
    Text,
    /// Output constrained to the given JSON schema.
    JsonSchema { name: String, schema: Value },
}

#[derive(Debug, Clone, Default)]
pub struct LlmParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub format: ResponseFormat,
    pub params: LlmParams,
}

// ── Errors ─────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request to {provider} failed: {source}")]
    Request {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("malformed {provider} response: {detail}")]
    Envelope { provider: String, detail: String },

    #[error("{0} returned empty response content")]
    EmptyResponse(String),
}

// ── Provider Trait ─────────────────────────────────────

/// Common interface for LLM providers (Ollama, OpenAI-compatible, ...).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Non-streaming chat completion; returns the raw assistant content.
    async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError>;

    /// Provider identifier (e.g. "openai", "ollama").
    fn id(&self) -> &str;
}

/// Map a non-success HTTP response into an [`LlmError::Api`].
pub(crate) async fn api_error(provider: &str, response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    LlmError::Api {
        provider: provider.to_string(),
        status,
        body,
    }
}
