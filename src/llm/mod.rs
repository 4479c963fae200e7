pub mod llm_config;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod service;

pub use llm_config::{load_config, LlmConfig, ResponseMode};
pub use provider::{ChatRequest, LlmError, LlmParams, LlmProvider, Message, ResponseFormat};
pub use service::build_provider;
