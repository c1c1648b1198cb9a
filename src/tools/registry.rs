//! Tool registry
//!
//! Holds the function declarations derived from the tool catalog, computed
//! once per session.

use thiserror::Error;
use tracing::{debug, warn};

use super::schema::sanitize;
use crate::llm::ToolDefinition;
use crate::mcp::ToolDescriptor;

const MAX_FUNCTION_NAME_LEN: usize = 64;

/// A catalog entry the engine would not accept as a function declaration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("invalid function name '{0}'")]
    InvalidName(String),

    #[error("'properties' of '{0}' is not an object")]
    InvalidParameters(String),
}

/// Builds the function declaration for one catalog entry
pub fn to_definition(descriptor: &ToolDescriptor) -> Result<ToolDefinition, RegistrationError> {
    if !is_valid_function_name(&descriptor.name) {
        return Err(RegistrationError::InvalidName(descriptor.name.clone()));
    }

    let parameters = sanitize(&descriptor.input_schema);
    if !parameters.get("properties").is_some_and(|p| p.is_object()) {
        return Err(RegistrationError::InvalidParameters(descriptor.name.clone()));
    }

    Ok(ToolDefinition {
        name: descriptor.name.clone(),
        description: descriptor.description.clone(),
        parameters,
    })
}

/// `[A-Za-z_][A-Za-z0-9_.-]*`, at most 64 characters
fn is_valid_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');

    starts_ok
        && name.len() <= MAX_FUNCTION_NAME_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Registers every catalog entry that converts cleanly; the rest are
    /// skipped with a warning.
    pub fn from_catalog(catalog: &[ToolDescriptor]) -> Self {
        let definitions = catalog
            .iter()
            .filter_map(|descriptor| match to_definition(descriptor) {
                Ok(definition) => {
                    debug!("Registered tool: {}", definition.name);
                    Some(definition)
                }
                Err(e) => {
                    warn!("Skip tool {}: {}", descriptor.name, e);
                    None
                }
            })
            .collect();

        Self { definitions }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
