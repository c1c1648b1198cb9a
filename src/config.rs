//! Configuration management for prscout
//!
//! Settings come from environment variables, optionally seeded from a `.env`
//! file in the working directory. Values already present in the environment
//! win over the file.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GITHUB_PAT_TOKEN`: GitHub personal access token handed to the MCP server
//! - `GITHUB_OWNER`: Repository owner
//! - `GITHUB_REPO`: Repository name
//! - `TARGET_PR_NUMBER`: Pull request number
//! - `GOOGLE_API_KEY`: Gemini API key
//! - `MODEL_ID`: Gemini model identifier (e.g. `gemini-2.0-flash`)
//!
//! ## Optional
//! - `PRSCOUT_MCP_COMMAND`: Container runtime used to launch the server - default: "docker"
//! - `PRSCOUT_MCP_IMAGE`: MCP server image - default: "ghcr.io/github/github-mcp-server"
//!
//! `PRSCOUT_LOG_LEVEL` and `PRSCOUT_LOG_JSON` are read by [`crate::util::logging`].
//!
//! # Example
//!
//! ```no_run
//! use prscout::config::{load_dotenv, AppConfig};
//!
//! load_dotenv();
//! let config = AppConfig::from_env();
//! config.validate().expect("Invalid configuration");
//! ```

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{BackendError, GenAIClient};
use crate::mcp::{McpServerCommand, DEFAULT_IMAGE};
use crate::tasks::{PullRequestContext, TaskRunner};

pub const TOKEN_VAR: &str = "GITHUB_PAT_TOKEN";
pub const OWNER_VAR: &str = "GITHUB_OWNER";
pub const REPO_VAR: &str = "GITHUB_REPO";
pub const PR_NUMBER_VAR: &str = "TARGET_PR_NUMBER";
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_VAR: &str = "MODEL_ID";

const MCP_COMMAND_VAR: &str = "PRSCOUT_MCP_COMMAND";
const MCP_IMAGE_VAR: &str = "PRSCOUT_MCP_IMAGE";

const DEFAULT_MCP_COMMAND: &str = "docker";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required values are absent or empty
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingValues(Vec<&'static str>),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    /// Engine client could not be built from the configured credentials
    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub github_token: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    /// Kept as text until [`AppConfig::pull_request`] so a bad value is
    /// reported rather than silently dropped
    pub pr_number: Option<String>,
    pub api_key: Option<String>,
    pub model_id: Option<String>,

    pub mcp_command: String,
    pub mcp_image: String,
}

/// Result of looking for a `.env` file in the working directory
#[derive(Debug)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    NotFound,
    Unreadable(String),
}

impl DotenvStatus {
    /// Logs the outcome; call once the subscriber is installed
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => debug!("Loaded environment from {}", path.display()),
            Self::NotFound => debug!("No .env file found"),
            Self::Unreadable(e) => warn!("Ignoring unreadable .env file: {}", e),
        }
    }
}

/// Seeds the process environment from `.env`. Existing variables win.
///
/// Call once at startup, before the logging subscriber reads its settings.
pub fn load_dotenv() -> DotenvStatus {
    match dotenvy::dotenv() {
        Ok(path) => DotenvStatus::Loaded(path),
        Err(e) if e.not_found() => DotenvStatus::NotFound,
        Err(e) => DotenvStatus::Unreadable(e.to_string()),
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            github_token: read_var(TOKEN_VAR),
            owner: read_var(OWNER_VAR),
            repo: read_var(REPO_VAR),
            pr_number: read_var(PR_NUMBER_VAR),
            api_key: read_var(API_KEY_VAR),
            model_id: read_var(MODEL_VAR),
            mcp_command: read_var(MCP_COMMAND_VAR)
                .unwrap_or_else(|| DEFAULT_MCP_COMMAND.to_string()),
            mcp_image: read_var(MCP_IMAGE_VAR).unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        }
    }

    /// Applies command-line overrides; `None` keeps the loaded value
    pub fn with_overrides(
        mut self,
        owner: Option<String>,
        repo: Option<String>,
        pr_number: Option<u64>,
        model_id: Option<String>,
    ) -> Self {
        if owner.is_some() {
            self.owner = owner;
        }
        if repo.is_some() {
            self.repo = repo;
        }
        if let Some(number) = pr_number {
            self.pr_number = Some(number.to_string());
        }
        if model_id.is_some() {
            self.model_id = model_id;
        }
        self
    }

    /// Reports every missing value at once, then checks the PR number parses
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<&'static str> = [
            (TOKEN_VAR, &self.github_token),
            (OWNER_VAR, &self.owner),
            (REPO_VAR, &self.repo),
            (PR_NUMBER_VAR, &self.pr_number),
            (API_KEY_VAR, &self.api_key),
            (MODEL_VAR, &self.model_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingValues(missing));
        }

        self.pull_request().map(|_| ())
    }

    pub fn pull_request(&self) -> Result<PullRequestContext, ConfigError> {
        let (Some(owner), Some(repo), Some(number)) = (&self.owner, &self.repo, &self.pr_number)
        else {
            return Err(ConfigError::MissingValues(
                [
                    (OWNER_VAR, self.owner.is_none()),
                    (REPO_VAR, self.repo.is_none()),
                    (PR_NUMBER_VAR, self.pr_number.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect(),
            ));
        };

        let number = number
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::ParseError {
                field: PR_NUMBER_VAR.to_string(),
                error: e.to_string(),
            })?;

        Ok(PullRequestContext::new(owner.clone(), repo.clone(), number))
    }

    pub fn server_command(&self) -> McpServerCommand {
        McpServerCommand::github_docker(self.mcp_command.clone(), self.mcp_image.clone())
    }

    /// Builds the Gemini client and the runner shared by all entry points
    pub fn create_runner(&self) -> Result<TaskRunner, ConfigError> {
        let (Some(token), Some(api_key), Some(model_id)) =
            (&self.github_token, &self.api_key, &self.model_id)
        else {
            return Err(ConfigError::MissingValues(
                [
                    (TOKEN_VAR, self.github_token.is_none()),
                    (API_KEY_VAR, self.api_key.is_none()),
                    (MODEL_VAR, self.model_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, missing)| missing.then_some(name))
                .collect(),
            ));
        };

        let llm = GenAIClient::new(api_key.clone(), model_id.clone())?;
        Ok(TaskRunner::new(
            self.server_command(),
            token.clone(),
            Arc::new(llm),
        ))
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn mask(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

fn or_unset(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<unset>")
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("github_token", &mask(&self.github_token))
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("pr_number", &self.pr_number)
            .field("api_key", &mask(&self.api_key))
            .field("model_id", &self.model_id)
            .field("mcp_command", &self.mcp_command)
            .field("mcp_image", &self.mcp_image)
            .finish()
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "prscout Configuration:")?;
        writeln!(f, "  GitHub Token: {}", mask(&self.github_token))?;
        writeln!(f, "  Owner: {}", or_unset(&self.owner))?;
        writeln!(f, "  Repository: {}", or_unset(&self.repo))?;
        writeln!(f, "  Pull Request: {}", or_unset(&self.pr_number))?;
        writeln!(f, "  API Key: {}", mask(&self.api_key))?;
        writeln!(f, "  Model: {}", or_unset(&self.model_id))?;
        writeln!(f, "  MCP Server: {} ({})", self.mcp_image, self.mcp_command)?;
        Ok(())
    }
}
