//! OpenAI-compatible chat-completions provider

pub mod client;
pub mod types;

pub use client::ChatCompletionsClient;
