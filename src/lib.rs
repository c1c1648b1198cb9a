//! prscout - Gemini-driven pull request assistant
//!
//! Gives a function-calling model the tool catalog of the GitHub MCP server
//! and lets it decide, turn by turn, which tools to call until it produces a
//! final answer about a pull request.
//!
//! # Core Concepts
//!
//! - **Transport**: [`mcp::McpClient`] launches the MCP server as a child
//!   process and exchanges newline-delimited JSON-RPC messages with it
//! - **Schema sanitizing**: [`tools::sanitize`] reduces each tool's input
//!   schema to something the model's function declarations accept
//! - **Agent loop**: [`agent::PullRequestAgent`] alternates model calls and
//!   tool calls, capped at ten round-trips
//! - **Tasks**: [`tasks`] holds the three entry points, each owning one
//!   server process for its whole run
//!
//! # Example Usage
//!
//! ```ignore
//! use prscout::config::load_dotenv;
//! use prscout::{list_pull_request_files, AppConfig};
//!
//! async fn files() -> Result<String, prscout::ConfigError> {
//!     load_dotenv().log();
//!     let config = AppConfig::from_env();
//!     config.validate()?;
//!
//!     let runner = config.create_runner()?;
//!     let context = config.pull_request()?;
//!     Ok(list_pull_request_files(&runner, &context).await)
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod mcp;
pub mod tasks;
pub mod tools;
pub mod util;

pub use agent::{AgentConfig, PullRequestAgent, TaskOutcome};
pub use config::{AppConfig, ConfigError};
pub use llm::{BackendError, GenAIClient, LLMClient};
pub use mcp::{McpClient, McpServerCommand, ToolProvider, TransportError};
pub use tasks::{
    add_secret_comment, analyze_pull_request, list_pull_request_files, CommentTarget,
    PullRequestContext, TaskRunner,
};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
