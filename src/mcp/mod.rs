//! Transport client for MCP tool-provider processes
//!
//! - [`McpConnection`]: newline-delimited JSON-RPC framing over any async pipe
//! - [`McpClient`]: launches and supervises the provider process
//! - [`ToolProvider`]: the tool-oriented seam the agent consumes

mod client;
mod connection;
mod error;
pub mod protocol;
mod provider;

pub use client::{McpClient, McpServerCommand, DEFAULT_IMAGE, DEFAULT_SHUTDOWN_GRACE, TOKEN_ENV};
pub use connection::McpConnection;
pub use error::TransportError;
pub use provider::{ToolDescriptor, ToolInvocationResult, ToolProvider};

#[cfg(test)]
pub use provider::MockToolProvider;
