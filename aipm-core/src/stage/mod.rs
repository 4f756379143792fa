//! Stage controllers.
//!
//! Each controller makes exactly one remote attempt through the shared
//! [`LlmClient`], validates the reply against the stage schema, and on any
//! transport or validation failure logs a warning and substitutes the local
//! generator's output. The returned [`StageOutcome`] records which path
//! produced the artifact.
//!
//! [`LlmClient`]: aipm_llm_sdk::LlmClient
//! [`StageOutcome`]: crate::model::StageOutcome

pub mod analysis;
pub mod document;
pub mod prompts;

pub use analysis::AnalysisStage;
pub use document::DocumentStage;
pub use prompts::PromptStage;

#[cfg(test)]
pub(crate) mod mock {
    use aipm_llm_sdk::{CompletionRequest, LlmClient, LlmError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted client for stage tests. Replies are consumed in order; once
    /// exhausted, further calls fail.
    pub struct MockLlmClient {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        calls: AtomicUsize,
        last_request: Mutex<Option<CompletionRequest>>,
    }

    impl MockLlmClient {
        pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        pub fn replying(text: &str) -> Self {
            Self::new(vec![Ok(text.to_string())])
        }

        pub fn failing() -> Self {
            Self::new(vec![Err(LlmError::api_error(500, "scripted failure"))])
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<CompletionRequest> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::api_error(500, "no scripted reply left")))
        }

        fn provider_name(&self) -> &str {
            "mock"
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }
}
