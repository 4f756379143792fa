use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};

/// Request body for the chat-completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Role-structured conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Streaming is never requested
    pub stream: bool,
}

/// Response body from the chat-completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Completion choices; the first one carries the reply
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// A single completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    pub message: ChoiceMessage,
    /// Reason the generation stopped, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Message payload inside a completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Role reported by the service
    #[serde(default)]
    pub role: Option<String>,
    /// Text content of the completion
    #[serde(default)]
    pub content: String,
}
