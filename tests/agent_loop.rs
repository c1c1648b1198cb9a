//! Agent loop tests using MockLLMClient and a scripted tool provider
//!
//! These exercise the round-trip state machine without a model or a server.

use std::sync::Arc;

use async_trait::async_trait;
use prscout::agent::{AgentConfig, PullRequestAgent, TaskOutcome, ITERATION_LIMIT_SENTINEL};
use prscout::llm::{MockLLMClient, MockResponse, TurnPayload, TurnRole};
use prscout::mcp::{ToolDescriptor, ToolInvocationResult, ToolProvider, TransportError};
use prscout::BackendError;
use serde_json::{json, Value};

/// Records every call; `fail_with` makes each call a transport failure
#[derive(Default)]
struct ScriptedProvider {
    calls: Vec<(String, Value)>,
    fail_with: Option<String>,
}

#[async_trait]
impl ToolProvider for ScriptedProvider {
    async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>, TransportError> {
        Ok(vec![ToolDescriptor {
            name: "get_pull_request_files".to_string(),
            description: "Get the list of files changed in a pull request".to_string(),
            input_schema: json!({
                "type": "object",
                "$schema": "http://json-schema.org/draft-07/schema#",
                "properties": {
                    "owner": {"type": "string"},
                    "repo": {"type": "string"},
                    "pullNumber": {"type": "number"}
                },
                "required": ["owner", "repo", "pullNumber"],
                "additionalProperties": false
            }),
        }])
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolInvocationResult, TransportError> {
        self.calls.push((name.to_string(), arguments));
        match &self.fail_with {
            Some(method) => Err(TransportError::NoResponse {
                method: method.clone(),
            }),
            None => Ok(ToolInvocationResult::Success(
                json!({"content": [{"type": "text", "text": "src/main.rs modified"}]}),
            )),
        }
    }
}

fn tool_calls(count: usize) -> Vec<MockResponse> {
    (0..count)
        .map(|i| MockResponse::tool_call(MockLLMClient::list_files_call(format!("call-{}", i), 42)))
        .collect()
}

#[tokio::test]
async fn test_eleven_tool_calls_hit_the_cap() {
    let mut provider = ScriptedProvider::default();
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses(tool_calls(11));

    let outcome = {
        let mut agent =
            PullRequestAgent::initialize(&mut provider, llm.clone(), AgentConfig::default())
                .await
                .unwrap();
        agent.execute_task("list files in PR #42").await
    };

    assert_eq!(outcome, TaskOutcome::IterationLimit);
    assert_eq!(outcome.into_message(), ITERATION_LIMIT_SENTINEL);
    assert_eq!(provider.calls.len(), 10);
    assert_eq!(llm.call_count(), 11);
    assert_eq!(llm.remaining_responses(), 0);
}

#[tokio::test]
async fn test_text_after_last_permitted_call_is_returned() {
    let mut provider = ScriptedProvider::default();
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses(tool_calls(10));
    llm.add_response(MockResponse::text("src/main.rs (modified)"));

    let outcome = {
        let mut agent =
            PullRequestAgent::initialize(&mut provider, llm.clone(), AgentConfig::default())
                .await
                .unwrap();
        agent.execute_task("list files in PR #42").await
    };

    assert_eq!(outcome, TaskOutcome::Answer("src/main.rs (modified)".to_string()));
    assert_eq!(provider.calls.len(), 10);
}

#[tokio::test]
async fn test_immediate_text_answer() {
    let mut provider = ScriptedProvider::default();
    let llm = Arc::new(MockLLMClient::new());
    llm.add_response(MockResponse::text("no files found"));

    let outcome = {
        let mut agent =
            PullRequestAgent::initialize(&mut provider, llm.clone(), AgentConfig::default())
                .await
                .unwrap();
        agent.execute_task("list files in PR #42").await
    };

    assert_eq!(outcome.into_message(), "no files found");
    assert_eq!(llm.call_count(), 1);
    assert!(provider.calls.is_empty());
}

#[tokio::test]
async fn test_conversation_grows_in_call_order() {
    let mut provider = ScriptedProvider::default();
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses(tool_calls(2));
    llm.add_response(MockResponse::text("done"));

    {
        let mut agent =
            PullRequestAgent::initialize(&mut provider, llm.clone(), AgentConfig::default())
                .await
                .unwrap();
        agent.execute_task("list files in PR #42").await;
    }

    let requests = llm.requests();
    let lengths: Vec<usize> = requests.iter().map(|r| r.turns.len()).collect();
    assert_eq!(lengths, vec![1, 3, 5]);

    // Earlier turns are never rewritten
    assert_eq!(requests[1].turns[..], requests[2].turns[..3]);

    let last = &requests[2].turns;
    assert_eq!(last[0].role, TurnRole::User);
    assert_eq!(last[1].role, TurnRole::Model);
    assert!(matches!(last[1].payload, TurnPayload::ToolCall { .. }));
    assert_eq!(last[2].role, TurnRole::User);
    match &last[4].payload {
        TurnPayload::ToolResult { call_id, name, .. } => {
            assert_eq!(call_id, "call-1");
            assert_eq!(name, "get_pull_request_files");
        }
        other => panic!("expected tool result, got {:?}", other),
    }

    // Sanitized declaration went out with every request
    for request in &requests {
        assert_eq!(request.tools.len(), 1);
        assert!(request.tools[0].parameters.get("$schema").is_none());
        assert!(request.tools[0].parameters.get("additionalProperties").is_none());
    }

    assert_eq!(
        provider.calls[0],
        (
            "get_pull_request_files".to_string(),
            json!({"owner": "octo", "repo": "demo", "pullNumber": 42})
        )
    );
}

#[tokio::test]
async fn test_failing_tool_is_reported_to_the_model() {
    let mut provider = ScriptedProvider {
        fail_with: Some("tools/call".to_string()),
        ..Default::default()
    };
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses(tool_calls(1));
    llm.add_response(MockResponse::text("The tool server is unavailable"));

    let outcome = {
        let mut agent =
            PullRequestAgent::initialize(&mut provider, llm.clone(), AgentConfig::default())
                .await
                .unwrap();
        agent.execute_task("list files in PR #42").await
    };

    assert_eq!(outcome.into_message(), "The tool server is unavailable");
    assert_eq!(llm.call_count(), 2);

    let requests = llm.requests();
    match &requests[1].turns[2].payload {
        TurnPayload::ToolResult { response, .. } => {
            let message = response["error"].as_str().unwrap();
            assert!(message.contains("tools/call"), "{}", message);
        }
        other => panic!("expected tool result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_engine_failure_mid_conversation() {
    let mut provider = ScriptedProvider::default();
    let llm = Arc::new(MockLLMClient::new());
    llm.add_responses(tool_calls(1));
    llm.add_response(MockResponse::error(BackendError::ApiError {
        message: "quota exceeded".to_string(),
        status_code: Some(429),
    }));

    let outcome = {
        let mut agent =
            PullRequestAgent::initialize(&mut provider, llm.clone(), AgentConfig::default())
                .await
                .unwrap();
        agent.execute_task("analyze PR #42").await
    };

    let message = outcome.into_message();
    assert!(
        message.starts_with("An error occurred during conversation:"),
        "{}",
        message
    );
    assert!(message.contains("quota exceeded"));
    assert_eq!(provider.calls.len(), 1);
    assert_eq!(llm.call_count(), 2);
}
