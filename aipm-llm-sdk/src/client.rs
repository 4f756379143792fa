use crate::{error::LlmError, types::CompletionRequest};
use async_trait::async_trait;

/// Core trait for LLM clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a request and return the first completion's text content
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;

    /// Get provider name (e.g., "chat-completions")
    fn provider_name(&self) -> &str;

    /// Get model name (e.g., "anthropic.claude-3.7-sonnet")
    fn model_name(&self) -> &str;
}
