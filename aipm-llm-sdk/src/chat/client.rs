use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::{
    chat::types::{ChatCompletionRequest, ChatCompletionResponse},
    client::LlmClient,
    error::LlmError,
    types::CompletionRequest,
};

/// Header carrying the request-correlation identifier
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Generate a request-correlation identifier: a timestamp plus a random
/// suffix. Used purely for external traceability.
pub fn generate_trace_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("aipm-{}-{}", millis, &suffix[..9])
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Sends `POST {base_url}/chat/completions` with bearer auth and a
/// per-instance trace id, and probes `GET {base_url}/models` for liveness.
pub struct ChatCompletionsClient {
    api_key: String,
    base_url: String,
    model: String,
    trace_id: String,
    http_client: reqwest::Client,
}

impl ChatCompletionsClient {
    /// Create a new client with the given API key, base URL and model
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Network { source: e })?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            trace_id: generate_trace_id(),
            http_client,
        })
    }

    /// Supply an explicit trace id instead of the generated one
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// The trace id attached to every request from this instance
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    fn headers(&self) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            TRACE_ID_HEADER,
            HeaderValue::from_str(&self.trace_id)
                .map_err(|_| LlmError::internal("Invalid trace id format"))?,
        );
        Ok(headers)
    }

    /// Send a chat-completion request and return the raw response body
    pub async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(model = %request.model, trace_id = %self.trace_id, "Sending chat completion request");

        let response = self
            .http_client
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network { source: e })?;

        let status = response.status();

        if status.is_success() {
            let completion: ChatCompletionResponse = response
                .json()
                .await
                .map_err(|e| LlmError::internal(format!("Failed to parse response: {}", e)))?;
            Ok(completion)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    Err(LlmError::authentication(error_text))
                }
                _ => Err(LlmError::api_error(status.as_u16(), error_text)),
            }
        }
    }

    /// Liveness probe: GET the models-listing path with the same auth
    /// header. Up/down is derived solely from the HTTP status; the payload
    /// is never inspected.
    pub async fn check_availability(&self) -> bool {
        let url = format!("{}/models", self.base_url);

        let headers = match self.headers() {
            Ok(headers) => headers,
            Err(_) => return false,
        };

        match self.http_client.get(&url).headers(headers).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Availability probe failed");
                false
            }
        }
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let chat_request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: request.messages(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self.create_chat_completion(chat_request).await?;

        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(content.to_string())
    }

    fn provider_name(&self) -> &str {
        "chat-completions"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
