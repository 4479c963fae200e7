//! OpenAI-compatible chat completions provider.
//!
//! Works against any `/chat/completions` endpoint (OpenAI, Gemini's OpenAI
//! compatibility layer, LM Studio, vLLM). Structured mode uses
//! `response_format: { "type": "json_schema", ... }`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::llm::provider::{api_error, ChatRequest, LlmError, LlmProvider, Message, ResponseFormat};
use crate::utils::http::{request_with_retry, RetryPolicy};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    provider_id: String,
    retry: RetryPolicy,
}

impl OpenAIProvider {
    pub fn new(
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
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            provider_id: "openai".to_string(),
            retry: RetryPolicy::new(2),
        }
    }

    pub fn with_id(mut self, id: String) -> Self {
        self.provider_id = id;
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_body(&self, request: &ChatRequest) -> ChatCompletionRequest {
        let response_format = match &request.format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonSchema { name, schema } => Some(serde_json::json!({
                "type": "json_schema",
                "json_schema": { "name": name, "schema": schema, "strict": true }
            })),
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: request.messages.clone(),
            stream: false,
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
            response_format,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn chat(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = self.build_body(request);

        tracing::debug!(
            "[LLM/{}] POST {} model={} structured={}",
            self.provider_id,
            url,
            self.model,
            body.response_format.is_some()
        );

        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let response = request_with_retry(
            move || {
                let client = client.clone();
                let url = url.clone();
                let body = body.clone();
                let api_key = api_key.clone();
                async move {
                    client
                        .post(&url)
                        .bearer_auth(api_key)
                        .json(&body)
                        .send()
                        .await
                }
            },
            self.retry,
        )
        .await
        .map_err(|source| LlmError::Request {
            provider: self.provider_id.clone(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(api_error(&self.provider_id, response).await);
        }

        let body: Value = response.json().await.map_err(|e| LlmError::Envelope {
            provider: self.provider_id.clone(),
            detail: e.to_string(),
        })?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::Envelope {
                provider: self.provider_id.clone(),
                detail: "missing choices[0].message.content".to_string(),
            })?;

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse(self.provider_id.clone()));
        }
        Ok(content.to_string())
    }

    fn id(&self) -> &str {
        &self.provider_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmParams;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenAIProvider {
        OpenAIProvider::new(
            "sk-test".to_string(),
            Some(format!("{}/v1", server.uri())),
            Some("gpt-4o-mini".to_string()),
            Duration::from_secs(5),
        )
        .with_client(Client::builder().no_proxy().build().unwrap())
        .with_retry(RetryPolicy::new(0))
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }

    #[tokio::test]
    async fn structured_request_carries_strict_json_schema() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(completion(r#"{"dialogue":"hey"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let request = ChatRequest {
            messages: vec![Message::user("hi")],
            format: ResponseFormat::JsonSchema {
                name: "character_action".to_string(),
                schema: serde_json::json!({ "type": "object" }),
            },
            params: LlmParams::default(),
        };
        let content = provider(&server).chat(&request).await.unwrap();
        assert_eq!(content, r#"{"dialogue":"hey"}"#);

        let received = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(
            body["response_format"]["json_schema"]["name"],
            "character_action"
        );
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert!(body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn missing_content_is_envelope_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let request = ChatRequest {
            messages: vec![Message::user("hi")],
            format: ResponseFormat::Text,
            params: LlmParams::default(),
        };
        let err = provider(&server).chat(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::Envelope { .. }), "got {:?}", err);
    }
}
