use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::config::AgentConfig;
use super::outcome::{EngineStage, TaskOutcome};
use crate::llm::{BackendError, ConversationTurn, EngineReply, LLMClient, LLMRequest, ToolCall};
use crate::mcp::{ToolInvocationResult, ToolProvider, TransportError};
use crate::tools::ToolRegistry;
use crate::util::preview;

const ANSWER_PREVIEW_CHARS: usize = 100;
const RESULT_PREVIEW_CHARS: usize = 200;

/// Drives one engine session over a borrowed tool provider.
pub struct PullRequestAgent<'a, P: ToolProvider + ?Sized> {
    provider: &'a mut P,
    llm: Arc<dyn LLMClient>,
    registry: ToolRegistry,
    config: AgentConfig,
}

impl<'a, P: ToolProvider + ?Sized> PullRequestAgent<'a, P> {
    /// Fetches the tool catalog and registers every declarable tool
    pub async fn initialize(
        provider: &'a mut P,
        llm: Arc<dyn LLMClient>,
        config: AgentConfig,
    ) -> Result<Self, TransportError> {
        let catalog = provider.list_tools().await?;
        let registry = ToolRegistry::from_catalog(&catalog);

        info!(
            "Agent initialized with {} tools ({} offered)",
            registry.len(),
            catalog.len()
        );

        Ok(Self {
            provider,
            llm,
            registry,
            config,
        })
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Runs `task` to completion. Never fails: every ending is a [`TaskOutcome`].
    pub async fn execute_task(&mut self, task: &str) -> TaskOutcome {
        let mut turns = vec![ConversationTurn::user(task)];

        let mut reply = match self.generate(&turns).await {
            Ok(reply) => reply,
            Err(e) => return engine_error(EngineStage::Initial, e),
        };

        for iteration in 1..=self.config.max_iterations {
            info!("--- Iteration {} ---", iteration);

            let call = match reply {
                EngineReply::Text(text) => {
                    info!("Response: {}...", preview(&text, ANSWER_PREVIEW_CHARS));
                    return TaskOutcome::Answer(text);
                }
                EngineReply::Empty => {
                    warn!("No response from model");
                    return TaskOutcome::NoResponse;
                }
                EngineReply::Malformed(reason) => {
                    warn!("Unsupported model response, stopping: {}", reason);
                    return TaskOutcome::Malformed(reason);
                }
                EngineReply::ToolCall(call) => call,
            };

            turns.push(ConversationTurn::tool_call(call.clone()));
            let result = self.invoke(&call).await;
            turns.push(ConversationTurn::tool_result(&call, result.into_payload()));

            reply = match self.generate(&turns).await {
                Ok(reply) => reply,
                Err(e) => return engine_error(EngineStage::Conversation, e),
            };
        }

        match reply {
            EngineReply::Text(text) => TaskOutcome::Answer(text),
            _ => {
                warn!(
                    "Iteration limit ({}) reached without an answer",
                    self.config.max_iterations
                );
                TaskOutcome::IterationLimit
            }
        }
    }

    async fn generate(&self, turns: &[ConversationTurn]) -> Result<EngineReply, BackendError> {
        let request = LLMRequest::new(turns.to_vec())
            .with_tools(self.registry.definitions().to_vec())
            .with_temperature(self.config.temperature);

        let response = self.llm.chat(request).await?;
        debug!(
            "{} responded in {}ms",
            self.llm.name(),
            response.response_time.as_millis()
        );
        Ok(response.reply)
    }

    /// Transport failures are folded into an error payload so the engine can
    /// recover or explain.
    async fn invoke(&mut self, call: &ToolCall) -> ToolInvocationResult {
        info!("Called tool: {}", call.name);
        debug!("  Arguments: {}", call.arguments);

        match self
            .provider
            .call_tool(&call.name, call.arguments.clone())
            .await
        {
            Ok(ToolInvocationResult::Success(value)) => {
                debug!(
                    "Tool result: {}...",
                    preview(&value.to_string(), RESULT_PREVIEW_CHARS)
                );
                ToolInvocationResult::Success(value)
            }
            Ok(failure) => failure,
            Err(e) => {
                warn!("Tool error: {}", e);
                ToolInvocationResult::failure(e.to_string())
            }
        }
    }
}

fn engine_error(stage: EngineStage, e: BackendError) -> TaskOutcome {
    error!("Engine call failed ({:?}): {}", stage, e);
    TaskOutcome::EngineError {
        stage,
        message: e.to_string(),
    }
}
