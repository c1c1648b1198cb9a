//! GenAI-based engine client
//!
//! Talks to Gemini (or any provider the `genai` crate resolves from the model
//! name) with function calling enabled. The API key is supplied explicitly
//! instead of being read from the provider's default environment variable.

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{
    ConversationTurn, EngineReply, LLMRequest, LLMResponse, ToolCall, ToolDefinition, TurnPayload,
    TurnRole,
};
use async_trait::async_trait;
use genai::chat::{
    ChatMessage as GenAIChatMessage, ChatOptions, ChatRequest as GenAIChatRequest, ChatResponse,
    ContentPart, MessageContent, Tool as GenAITool, ToolResponse,
};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error};

pub struct GenAIClient {
    client: Client,
    model: String,
}

impl GenAIClient {
    /// Creates a client for `model` authenticated with `api_key`
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, BackendError> {
        let api_key = api_key.into();
        let model = model.into();

        if api_key.trim().is_empty() {
            return Err(BackendError::ConfigurationError {
                message: "API key is empty".to_string(),
            });
        }
        if model.trim().is_empty() {
            return Err(BackendError::ConfigurationError {
                message: "model identifier is empty".to_string(),
            });
        }

        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(api_key.clone())))
            },
        );

        let client = Client::builder().with_auth_resolver(auth_resolver).build();

        debug!("Creating GenAI client: model={}", model);

        Ok(Self { client, model })
    }

    fn convert_turn(turn: &ConversationTurn) -> GenAIChatMessage {
        match (&turn.role, &turn.payload) {
            (TurnRole::User, TurnPayload::Text { text }) => GenAIChatMessage::user(text),
            (TurnRole::Model, TurnPayload::Text { text }) => GenAIChatMessage::assistant(text),
            (_, TurnPayload::ToolCall { call }) => {
                let genai_call = genai::chat::ToolCall {
                    call_id: call.call_id.clone(),
                    fn_name: call.name.clone(),
                    fn_arguments: call.arguments.clone(),
                };
                GenAIChatMessage::assistant(MessageContent::from_tool_calls(vec![genai_call]))
            }
            (_, TurnPayload::ToolResult {
                call_id, response, ..
            }) => ToolResponse {
                call_id: call_id.clone(),
                content: response.to_string(),
            }
            .into(),
        }
    }

    fn convert_tool(tool: &ToolDefinition) -> GenAITool {
        GenAITool::new(&tool.name)
            .with_description(&tool.description)
            .with_schema(tool.parameters.clone())
    }

    fn classify(response: &ChatResponse) -> EngineReply {
        classify_reply(first_part(response.content.parts()))
    }
}

/// The leading content part of an engine response, reduced to what the agent
/// loop distinguishes
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FirstPart<'a> {
    Text(&'a str),
    ToolCall {
        call_id: &'a str,
        name: &'a str,
        arguments: &'a Value,
    },
    Unsupported(&'static str),
}

pub(crate) fn first_part(parts: &[ContentPart]) -> Option<FirstPart<'_>> {
    parts.first().map(|part| match part {
        ContentPart::Text(text) => FirstPart::Text(text),
        ContentPart::ToolCall(call) => FirstPart::ToolCall {
            call_id: &call.call_id,
            name: &call.fn_name,
            arguments: &call.fn_arguments,
        },
        ContentPart::Binary(_) => FirstPart::Unsupported("binary content"),
        ContentPart::ToolResponse(_) => FirstPart::Unsupported("tool response"),
        #[allow(unreachable_patterns)]
        _ => FirstPart::Unsupported("unknown content part"),
    })
}

/// Maps the first content part of an engine response onto [`EngineReply`].
///
/// Later parts are ignored: text first is an answer even when a tool call
/// follows it.
pub(crate) fn classify_reply(first: Option<FirstPart<'_>>) -> EngineReply {
    match first {
        None | Some(FirstPart::Text("")) => EngineReply::Empty,
        Some(FirstPart::Text(text)) => EngineReply::Text(text.to_string()),
        Some(FirstPart::Unsupported(kind)) => {
            EngineReply::Malformed(format!("first part is {}", kind))
        }
        Some(FirstPart::ToolCall {
            call_id,
            name,
            arguments,
        }) => {
            if name.trim().is_empty() {
                return EngineReply::Malformed("tool call without a function name".to_string());
            }
            let arguments = match arguments {
                Value::Null => Value::Object(Default::default()),
                Value::Object(_) => arguments.clone(),
                other => {
                    return EngineReply::Malformed(format!(
                        "tool call '{}' has non-object arguments: {}",
                        name, other
                    ))
                }
            };
            EngineReply::ToolCall(ToolCall {
                call_id: call_id.to_string(),
                name: name.to_string(),
                arguments,
            })
        }
    }
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError> {
        let start = Instant::now();

        let messages: Vec<GenAIChatMessage> =
            request.turns.iter().map(Self::convert_turn).collect();
        let tools: Vec<GenAITool> = request.tools.iter().map(Self::convert_tool).collect();

        let genai_request = GenAIChatRequest::new(messages).with_tools(tools);

        let mut options = ChatOptions::default();
        if let Some(temp) = request.temperature {
            options = options.with_temperature(temp as f64);
        }

        let response = self
            .client
            .exec_chat(&self.model, genai_request, Some(&options))
            .await
            .map_err(|e| {
                error!("{} request failed: {}", self.model, e);
                BackendError::ApiError {
                    message: e.to_string(),
                    status_code: None,
                }
            })?;

        Ok(LLMResponse::new(Self::classify(&response), start.elapsed()))
    }

    fn name(&self) -> &str {
        "GenAI"
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
