use super::client::LLMClient;
use super::error::BackendError;
use super::types::{EngineReply, LLMRequest, LLMResponse, ToolCall};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted engine for tests: replays queued replies and records every request.
pub struct MockLLMClient {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<LLMRequest>>,
    name: String,
}

#[derive(Debug, Clone)]
pub enum MockResponse {
    Reply(EngineReply),
    Error(BackendError),
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Reply(EngineReply::Text(content.into()))
    }

    pub fn tool_call(call: ToolCall) -> Self {
        Self::Reply(EngineReply::ToolCall(call))
    }

    pub fn empty() -> Self {
        Self::Reply(EngineReply::Empty)
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Reply(EngineReply::Malformed(reason.into()))
    }

    pub fn error(error: BackendError) -> Self {
        Self::Error(error)
    }
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self::with_name("MockLLM")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            name: name.into(),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Number of `chat` calls made so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Snapshot of every request received, in call order
    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn tool_call(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> ToolCall {
        ToolCall {
            call_id: call_id.into(),
            name: name.into(),
            arguments,
        }
    }

    pub fn list_files_call(call_id: impl Into<String>, pull_number: u64) -> ToolCall {
        Self::tool_call(
            call_id,
            "get_pull_request_files",
            serde_json::json!({ "owner": "octo", "repo": "demo", "pullNumber": pull_number }),
        )
    }
}

impl Default for MockLLMClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        self.requests.lock().unwrap().push(request);

        let response =
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| BackendError::Other {
                    message: "MockLLMClient: No more responses in queue".to_string(),
                })?;

        match response {
            MockResponse::Reply(reply) => Ok(LLMResponse::new(reply, Duration::from_millis(10))),
            MockResponse::Error(error) => Err(error),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

impl std::fmt::Debug for MockLLMClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLLMClient")
            .field("name", &self.name)
            .field("remaining_responses", &self.remaining_responses())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ConversationTurn;

    fn request() -> LLMRequest {
        LLMRequest::new(vec![ConversationTurn::user("task")])
    }

    #[tokio::test]
    async fn test_mock_client_basic() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::text("Hello!"));

        let response = client.chat(request()).await.unwrap();

        assert_eq!(response.reply, EngineReply::Text("Hello!".to_string()));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_with_tool_call() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::tool_call(MockLLMClient::list_files_call(
            "call_1", 42,
        )));

        let response = client.chat(request()).await.unwrap();

        match response.reply {
            EngineReply::ToolCall(call) => {
                assert_eq!(call.name, "get_pull_request_files");
                assert_eq!(call.arguments["pullNumber"], 42);
            }
            other => panic!("expected tool call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let client = MockLLMClient::new();
        client.add_response(MockResponse::error(BackendError::ApiError {
            message: "quota".to_string(),
            status_code: Some(429),
        }));

        assert!(client.chat(request()).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_no_responses() {
        let client = MockLLMClient::new();

        assert!(client.chat(request()).await.is_err());
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_records_requests_in_order() {
        let client = MockLLMClient::new();
        client.add_responses(vec![MockResponse::empty(), MockResponse::text("Second")]);

        client
            .chat(LLMRequest::new(vec![ConversationTurn::user("first")]))
            .await
            .unwrap();
        client
            .chat(LLMRequest::new(vec![ConversationTurn::user("second")]))
            .await
            .unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].turns[0].text(), Some("first"));
        assert_eq!(requests[1].turns[0].text(), Some("second"));
        assert_eq!(client.remaining_responses(), 0);
    }

    #[test]
    fn test_custom_name() {
        let client = MockLLMClient::with_name("Scripted");
        assert_eq!(client.name(), "Scripted");
    }
}
