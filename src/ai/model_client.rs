//! One prompt in, raw model output (or nothing) out.

use std::sync::Arc;

use crate::ai::prompts::{character_action_schema, PromptContext, CHARACTER_ACTION_SCHEMA_NAME};
use crate::llm::{ChatRequest, LlmParams, LlmProvider, ResponseFormat, ResponseMode};

#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn LlmProvider>,
    context: Arc<PromptContext>,
    mode: ResponseMode,
    params: LlmParams,
}

impl ModelClient {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        context: Arc<PromptContext>,
        mode: ResponseMode,
        params: LlmParams,
    ) -> Self {
        Self {
            provider,
            context,
            mode,
            params,
        }
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn build_request(&self, user_text: &str) -> ChatRequest {
        let format = match self.mode {
            ResponseMode::Freeform => ResponseFormat::Text,
            ResponseMode::Structured => ResponseFormat::JsonSchema {
                name: CHARACTER_ACTION_SCHEMA_NAME.to_string(),
                schema: character_action_schema(),
            },
        };
        ChatRequest {
            messages: self.context.build_messages(user_text),
            format,
            params: self.params.clone(),
        }
    }

    /// Exactly one backend call. Every failure is logged and collapses to `None`.
    pub async fn send_prompt(&self, user_text: &str) -> Option<String> {
        let request = self.build_request(user_text);
        match self.provider.chat(&request).await {
            Ok(content) => {
                tracing::debug!(
                    "[LLM] {} replied with {} chars",
                    self.provider.id(),
                    content.len()
                );
                Some(content)
            }
            Err(e) => {
                tracing::error!("[LLM] Request via {} failed: {}", self.provider.id(), e);
                None
            }
        }
    }
}
