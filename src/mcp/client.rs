//! Supervision of the tool-provider child process.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use super::connection::McpConnection;
use super::error::TransportError;
use super::provider::{ToolDescriptor, ToolInvocationResult, ToolProvider};

/// Environment variable the GitHub MCP server reads its token from
pub const TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";
pub const DEFAULT_IMAGE: &str = "ghcr.io/github/github-mcp-server";

/// How long `stop()` waits for the process to exit before killing it
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// How to launch the tool-provider process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpServerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl McpServerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `docker run` of the GitHub MCP server image. The token is forwarded
    /// from the child's environment, so it never appears in argv.
    pub fn github_docker(docker: impl Into<String>, image: impl Into<String>) -> Self {
        let image: String = image.into();
        Self::new(docker).with_args(["run", "-i", "--rm", "-e", TOKEN_ENV, image.as_str()])
    }
}

impl Default for McpServerCommand {
    fn default() -> Self {
        Self::github_docker("docker", DEFAULT_IMAGE)
    }
}

type ChildConnection = McpConnection<BufReader<ChildStdout>, ChildStdin>;

struct RunningServer {
    child: Child,
    connection: ChildConnection,
}

/// Transport client owning one tool-provider process
pub struct McpClient {
    command: McpServerCommand,
    token: String,
    shutdown_grace: Duration,
    server: Option<RunningServer>,
}

impl McpClient {
    pub fn new(command: McpServerCommand, token: impl Into<String>) -> Self {
        Self {
            command,
            token: token.into(),
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            server: None,
        }
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// OS process id of the running server
    pub fn server_pid(&self) -> Option<u32> {
        self.server.as_ref().and_then(|server| server.child.id())
    }

    pub fn is_running(&self) -> bool {
        self.server.is_some()
    }

    /// Launches the process and performs the initialize handshake
    pub async fn start(&mut self) -> Result<(), TransportError> {
        if self.server.is_some() {
            return Err(TransportError::AlreadyStarted);
        }

        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .env(TOKEN_ENV, &self.token)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(TransportError::MissingPipe("stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or(TransportError::MissingPipe("stdout"))?;

        info!("GitHub MCP server running ({})", self.command.program);

        let mut connection = McpConnection::new(BufReader::new(stdout), stdin);
        if let Err(e) = connection.initialize().await {
            warn!("MCP handshake failed: {}", e);
            shutdown(child, connection, self.shutdown_grace).await;
            return Err(e);
        }

        self.server = Some(RunningServer { child, connection });
        Ok(())
    }

    /// Closes the pipes and waits for exit; kills the process after a grace
    /// period. No-op when nothing is running.
    pub async fn stop(&mut self) {
        if let Some(RunningServer { child, connection }) = self.server.take() {
            shutdown(child, connection, self.shutdown_grace).await;
            info!("GitHub MCP server stopped");
        }
    }

    fn connection(&mut self) -> Result<&mut ChildConnection, TransportError> {
        self.server
            .as_mut()
            .map(|server| &mut server.connection)
            .ok_or(TransportError::NotStarted)
    }
}

async fn shutdown(mut child: Child, connection: ChildConnection, grace: Duration) {
    drop(connection.into_parts());

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(status)) => debug!("Tool provider exited: {}", status),
        Ok(Err(e)) => warn!("Failed to wait for tool provider: {}", e),
        Err(_) => {
            warn!(
                "Tool provider still running after {}ms, killing it",
                grace.as_millis()
            );
            if let Err(e) = child.kill().await {
                warn!("Failed to kill tool provider: {}", e);
            }
        }
    }
}

#[async_trait]
impl ToolProvider for McpClient {
    async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>, TransportError> {
        self.connection()?.list_tools().await
    }

    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolInvocationResult, TransportError> {
        self.connection()?.call_tool(name, arguments).await
    }
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient")
            .field("command", &self.command)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
