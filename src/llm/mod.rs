//! Reasoning-engine abstraction layer
//!
//! A trait-based seam over the function-calling engine, so the GenAI client and
//! the scripted mock can be used interchangeably by the agent loop.

mod client;
mod error;
mod genai_client;
mod mock;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use genai_client::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use types::{
    ConversationTurn, EngineReply, LLMRequest, LLMResponse, ToolCall, ToolDefinition, TurnPayload,
    TurnRole,
};
