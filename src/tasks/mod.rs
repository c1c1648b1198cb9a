//! Task entry points
//!
//! Each entry point launches its own tool-provider process, runs one fixed
//! task through a [`PullRequestAgent`], and stops the process again no matter
//! how the task ended. Every outcome, failures included, comes back as a
//! single string.

mod context;
pub mod templates;

pub use context::{CommentTarget, PullRequestContext};

use std::sync::Arc;

use tracing::{error, info};

use crate::agent::{AgentConfig, PullRequestAgent};
use crate::llm::LLMClient;
use crate::mcp::{McpClient, McpServerCommand};

/// Everything a task needs besides the pull request itself
#[derive(Clone)]
pub struct TaskRunner {
    server: McpServerCommand,
    token: String,
    llm: Arc<dyn LLMClient>,
    agent_config: AgentConfig,
}

impl TaskRunner {
    pub fn new(server: McpServerCommand, token: impl Into<String>, llm: Arc<dyn LLMClient>) -> Self {
        Self {
            server,
            token: token.into(),
            llm,
            agent_config: AgentConfig::default(),
        }
    }

    pub fn with_agent_config(mut self, agent_config: AgentConfig) -> Self {
        self.agent_config = agent_config;
        self
    }

    /// Runs one task against a freshly started tool provider
    pub async fn run(&self, task: &str) -> String {
        let mut client = McpClient::new(self.server.clone(), self.token.clone());

        if let Err(e) = client.start().await {
            error!("Failed to start GitHub MCP server: {}", e);
            client.stop().await;
            return format!("Failed to start GitHub MCP server: {}", e);
        }

        let result = self.run_with(&mut client, task).await;
        client.stop().await;
        result
    }

    async fn run_with(&self, client: &mut McpClient, task: &str) -> String {
        let mut agent =
            match PullRequestAgent::initialize(client, self.llm.clone(), self.agent_config.clone())
                .await
            {
                Ok(agent) => agent,
                Err(e) => {
                    error!("Failed to initialize agent: {}", e);
                    return format!("Failed to initialize agent: {}", e);
                }
            };

        agent.execute_task(task).await.into_message()
    }
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("server", &self.server)
            .field("token", &"<redacted>")
            .field("llm", &self.llm.name())
            .field("agent_config", &self.agent_config)
            .finish()
    }
}

/// Looks for committed secrets and comments on them
pub async fn add_secret_comment(
    runner: &TaskRunner,
    context: &PullRequestContext,
    target: CommentTarget,
) -> String {
    info!("Checking {} for secrets ({:?})", context, target);
    runner
        .run(&templates::secret_detection(context, target))
        .await
}

pub async fn list_pull_request_files(runner: &TaskRunner, context: &PullRequestContext) -> String {
    info!("Listing files of {}", context);
    runner.run(&templates::list_files(context)).await
}

pub async fn analyze_pull_request(runner: &TaskRunner, context: &PullRequestContext) -> String {
    info!("Analyzing {}", context);
    runner.run(&templates::full_analysis(context)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLLMClient, MockResponse};

    #[tokio::test]
    async fn test_launch_failure_is_rendered_as_result() {
        let llm = Arc::new(MockLLMClient::new());
        llm.add_response(MockResponse::text("unreachable"));

        let runner = TaskRunner::new(
            McpServerCommand::new("/nonexistent/prscout-mcp-server"),
            "ghp_test",
            llm.clone(),
        );
        let result =
            list_pull_request_files(&runner, &PullRequestContext::new("octo", "demo", 1)).await;

        assert!(
            result.starts_with("Failed to start GitHub MCP server:"),
            "{}",
            result
        );
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_debug_hides_token() {
        let runner = TaskRunner::new(
            McpServerCommand::default(),
            "ghp_secret",
            Arc::new(MockLLMClient::new()),
        );
        let debug = format!("{:?}", runner);

        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("MockLLM"));
    }
}
