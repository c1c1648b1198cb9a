//! Reasoning-engine communication types
//!
//! This module defines the conversation and reply types exchanged with the
//! engine, independent of any specific provider implementation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The task text or a tool result
    User,
    /// Engine output: free text or a tool-call request
    Model,
}

/// What a turn carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnPayload {
    Text { text: String },
    ToolCall { call: ToolCall },
    ToolResult {
        call_id: String,
        name: String,
        /// Result document fed back to the engine, `{"error": ...}` on failure
        response: serde_json::Value,
    },
}

/// One entry of the append-only conversation for a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub payload: TurnPayload,
}

impl ConversationTurn {
    /// Creates a user turn carrying free text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            payload: TurnPayload::Text { text: text.into() },
        }
    }

    /// Creates a model turn carrying free text
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            payload: TurnPayload::Text { text: text.into() },
        }
    }

    /// Creates a model turn recording a tool-call request
    pub fn tool_call(call: ToolCall) -> Self {
        Self {
            role: TurnRole::Model,
            payload: TurnPayload::ToolCall { call },
        }
    }

    /// Creates a user turn carrying the result of `call`
    pub fn tool_result(call: &ToolCall, response: serde_json::Value) -> Self {
        Self {
            role: TurnRole::User,
            payload: TurnPayload::ToolResult {
                call_id: call.call_id.clone(),
                name: call.name.clone(),
                response,
            },
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            TurnPayload::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// A tool call requested by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier correlating the call with its result
    pub call_id: String,
    /// Name of the tool to call
    pub name: String,
    /// Arguments to pass to the tool (JSON object)
    pub arguments: serde_json::Value,
}

/// Function declaration offered to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// Sanitized JSON Schema for the tool's parameters
    pub parameters: serde_json::Value,
}

/// Request to send to the engine
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Full conversation so far
    pub turns: Vec<ConversationTurn>,
    /// Function declarations available to the engine
    pub tools: Vec<ToolDefinition>,
    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl LLMRequest {
    pub fn new(turns: Vec<ConversationTurn>) -> Self {
        Self {
            turns,
            tools: Vec::new(),
            temperature: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Classified content of one engine response.
///
/// Exactly one of these is produced per response, so the agent loop can match
/// it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    /// Free text: the final answer
    Text(String),
    /// A request to invoke one tool
    ToolCall(ToolCall),
    /// No candidate or no content parts
    Empty,
    /// Content that is neither text nor a usable tool call
    Malformed(String),
}

/// Response from the engine
#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub reply: EngineReply,
    /// Time taken for the request
    pub response_time: Duration,
}

impl LLMResponse {
    pub fn new(reply: EngineReply, response_time: Duration) -> Self {
        Self {
            reply,
            response_time,
        }
    }

    pub fn text(content: impl Into<String>, response_time: Duration) -> Self {
        Self::new(EngineReply::Text(content.into()), response_time)
    }

    pub fn tool_call(call: ToolCall, response_time: Duration) -> Self {
        Self::new(EngineReply::ToolCall(call), response_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_call() -> ToolCall {
        ToolCall {
            call_id: "call_1".to_string(),
            name: "get_pull_request_files".to_string(),
            arguments: json!({"owner": "octo", "repo": "demo", "pullNumber": 42}),
        }
    }

    #[test]
    fn test_turn_constructors() {
        let user = ConversationTurn::user("list files in PR #42");
        assert_eq!(user.role, TurnRole::User);
        assert_eq!(user.text(), Some("list files in PR #42"));

        let model = ConversationTurn::model("done");
        assert_eq!(model.role, TurnRole::Model);

        let call = ConversationTurn::tool_call(sample_call());
        assert_eq!(call.role, TurnRole::Model);
        assert!(call.text().is_none());
    }

    #[test]
    fn test_tool_result_is_correlated_with_call() {
        let call = sample_call();
        let turn = ConversationTurn::tool_result(&call, json!({"error": "not found"}));

        assert_eq!(turn.role, TurnRole::User);
        match turn.payload {
            TurnPayload::ToolResult {
                call_id,
                name,
                response,
            } => {
                assert_eq!(call_id, "call_1");
                assert_eq!(name, "get_pull_request_files");
                assert_eq!(response["error"], "not found");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_request_builder() {
        let request = LLMRequest::new(vec![ConversationTurn::user("hi")]).with_temperature(0.7);

        assert_eq!(request.temperature, Some(0.7));
        assert!(request.tools.is_empty());
        assert_eq!(request.turns.len(), 1);
    }

    #[test]
    fn test_turn_serializes_with_kind_tag() {
        let value = serde_json::to_value(ConversationTurn::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "payload": {"kind": "text", "text": "hi"}}));
    }
}
