use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use super::error::TransportError;

/// One entry of the tool catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Reads a `tools/list` entry; `None` when it has no string `name`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?.to_string();
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("No description")
            .to_string();
        let input_schema = value.get("inputSchema").cloned().unwrap_or_else(|| json!({}));

        Some(Self {
            name,
            description,
            input_schema,
        })
    }

    /// Decodes a whole catalog, dropping nameless entries
    pub fn catalog(values: &[Value]) -> Vec<Self> {
        values
            .iter()
            .filter_map(|value| {
                let descriptor = Self::from_value(value);
                if descriptor.is_none() {
                    warn!("Skipping tool without a name: {}", value);
                }
                descriptor
            })
            .collect()
    }
}

/// Outcome of one `tools/call`: exactly one of success or failure
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocationResult {
    Success(Value),
    Failure { message: String },
}

impl ToolInvocationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Document handed back to the engine
    pub fn into_payload(self) -> Value {
        match self {
            Self::Success(value) => value,
            Self::Failure { message } => json!({ "error": message }),
        }
    }
}

/// Something that can enumerate and invoke tools.
///
/// Methods take `&mut self`: at most one request is ever in flight.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolProvider: Send {
    async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>, TransportError>;

    /// Tool-level errors come back as [`ToolInvocationResult::Failure`], not `Err`.
    async fn call_tool(
        &mut self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolInvocationResult, TransportError>;
}
