use aipm_llm_sdk::chat::ChatCompletionsClient;
use aipm_llm_sdk::client::LlmClient;
use aipm_llm_sdk::error::LlmError;
use aipm_llm_sdk::types::CompletionRequest;
use mockito::Matcher;

fn test_client(server: &mockito::ServerGuard) -> ChatCompletionsClient {
    ChatCompletionsClient::new("test-key", server.url(), "test-model").unwrap()
}

#[tokio::test]
async fn complete_returns_first_choice_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_header("x-trace-id", Matcher::Regex("^aipm-".to_string()))
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "test-model",
            "temperature": 0.7,
            "max_tokens": 4000,
            "stream": false
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "{\"questions\": []}" } },
                    { "message": { "role": "assistant", "content": "ignored" } }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = test_client(&server);
    let text = client
        .complete(CompletionRequest::new("分析需求").with_system("你是产品经理"))
        .await
        .unwrap();

    assert_eq!(text, "{\"questions\": []}");
    mock.assert_async().await;
}

#[tokio::test]
async fn complete_sends_system_then_user_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "messages": [
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "prompt" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
        .create_async()
        .await;

    let client = test_client(&server);
    let text = client
        .complete(CompletionRequest::new("prompt").with_system("sys"))
        .await
        .unwrap();

    assert_eq!(text, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("internal failure")
        .create_async()
        .await;

    let client = test_client(&server);
    let result = client.complete(CompletionRequest::new("prompt")).await;

    match result.unwrap_err() {
        LlmError::Api { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("internal failure"));
        }
        other => panic!("Expected API error, got: {:?}", other),
    }
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body("invalid key")
        .create_async()
        .await;

    let client = test_client(&server);
    let result = client.complete(CompletionRequest::new("prompt")).await;

    match result.unwrap_err() {
        LlmError::Authentication { .. } => {}
        other => panic!("Expected authentication error, got: {:?}", other),
    }
}

#[tokio::test]
async fn missing_choices_maps_to_empty_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let client = test_client(&server);
    let result = client.complete(CompletionRequest::new("prompt")).await;

    match result.unwrap_err() {
        LlmError::EmptyResponse => {}
        other => panic!("Expected empty response error, got: {:?}", other),
    }
}

#[tokio::test]
async fn blank_content_maps_to_empty_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":""}}]}"#)
        .create_async()
        .await;

    let client = test_client(&server);
    let result = client.complete(CompletionRequest::new("prompt")).await;

    assert!(matches!(result.unwrap_err(), LlmError::EmptyResponse));
}

#[tokio::test]
async fn availability_probe_reports_up() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_body(r#"{"data":[]}"#)
        .create_async()
        .await;

    let client = test_client(&server);
    assert!(client.check_availability().await);
    mock.assert_async().await;
}

#[tokio::test]
async fn availability_probe_reports_down_on_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/models")
        .with_status(503)
        .create_async()
        .await;

    let client = test_client(&server);
    assert!(!client.check_availability().await);
}
