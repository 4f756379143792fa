//! # aipm LLM SDK
//!
//! A small LLM SDK for the aipm requirement pipeline: a provider-agnostic
//! [`client::LlmClient`] trait and a client for OpenAI-compatible
//! chat-completions endpoints.
//!
//! ## Example
//!
//! ```rust,no_run
//! use aipm_llm_sdk::chat::ChatCompletionsClient;
//! use aipm_llm_sdk::client::LlmClient;
//! use aipm_llm_sdk::types::CompletionRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatCompletionsClient::new(
//!         "your-api-key",
//!         "https://api.example.com/v1/openai/native",
//!         "anthropic.claude-3.7-sonnet",
//!     )?;
//!
//!     let request = CompletionRequest::new("请分析以下用户需求……")
//!         .with_system("你是一位资深的产品经理。");
//!     let text = client.complete(request).await?;
//!     println!("Response: {}", text);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod client;
pub mod error;
pub mod types;

pub use chat::ChatCompletionsClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use types::{ChatMessage, CompletionRequest, Role};

#[cfg(test)]
mod tests {
    use crate::chat::client::{generate_trace_id, ChatCompletionsClient};
    use crate::types::{ChatMessage, CompletionRequest, Role};

    #[test]
    fn test_client_creation() {
        let client = ChatCompletionsClient::new("test-key", "https://api.test/v1", "test-model");
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_creation_empty_key() {
        let client = ChatCompletionsClient::new("", "https://api.test/v1", "test-model");
        assert!(client.is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            ChatCompletionsClient::new("test-key", "https://api.test/v1/", "test-model").unwrap();
        // Trace id is generated per instance
        assert!(client.trace_id().starts_with("aipm-"));
    }

    #[test]
    fn test_trace_id_format() {
        let trace_id = generate_trace_id();
        let parts: Vec<&str> = trace_id.splitn(3, '-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "aipm");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[test]
    fn test_explicit_trace_id() {
        let client = ChatCompletionsClient::new("test-key", "https://api.test/v1", "test-model")
            .unwrap()
            .with_trace_id("aipm-0-abcdefghi");
        assert_eq!(client.trace_id(), "aipm-0-abcdefghi");
    }

    #[test]
    fn test_message_list_without_system() {
        let request = CompletionRequest::new("hello");
        let messages = request.messages();
        assert_eq!(messages, vec![ChatMessage::user("hello")]);
    }

    #[test]
    fn test_message_list_with_system() {
        let request = CompletionRequest::new("hello").with_system("be brief");
        let messages = request.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
    }

    #[test]
    fn test_request_defaults() {
        let request = CompletionRequest::new("hello");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 4000);
    }
}
