//! Ollama provider: non-streaming `/api/chat`.
//!
//! Structured mode passes the JSON schema through Ollama's `format` field so
//! decoding is constrained server-side:
//! ```json
//! {"model":"llama3.1:8b","messages":[...],"stream":false,"format":{"type":"object",...}}
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::llm::provider::{api_error, ChatRequest, LlmError, LlmProvider, Message, ResponseFormat};
use crate::utils::http::{request_with_retry, RetryPolicy};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

#[derive(Debug, Clone, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessageResponse>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessageResponse {
    content: Option<String>,
}

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

impl OllamaProvider {
    pub fn new(base_url: Option<String>, model: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            model,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_body(&self, request: &ChatRequest) -> OllamaChatRequest {
        let mut opts_map = serde_json::Map::new();
        if let Some(t) = request.params.temperature {
            opts_map.insert("temperature".to_string(), serde_json::json!(t));
        }
        if let Some(m) = request.params.max_tokens {
            opts_map.insert("num_predict".to_string(), serde_json::json!(m));
        }

        let format = match &request.format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonSchema { schema, .. } => Some(schema.clone()),
        };

        OllamaChatRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            stream: false,
            format,
            options: if opts_map.is_empty() {
                None
            } else {
                Some(Value::Object(opts_map))
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let body = self.build_body(request);

        tracing::debug!(
            "[LLM/Ollama] POST {} model={} structured={}",
            url,
            self.model,
            body.format.is_some()
        );

        let client = self.client.clone();
        let response = request_with_retry(
            move || {
                let client = client.clone();
                let url = url.clone();
                let body = body.clone();
                async move { client.post(&url).json(&body).send().await }
            },
            self.retry,
        )
        .await
        .map_err(|source| LlmError::Request {
            provider: self.id().to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(api_error(self.id(), response).await);
        }

        let chunk: OllamaChatResponse =
            response.json().await.map_err(|e| LlmError::Envelope {
                provider: self.id().to_string(),
                detail: e.to_string(),
            })?;

        chunk
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyResponse(self.id().to_string()))
    }

    fn id(&self) -> &str {
        "ollama"
    }
}
