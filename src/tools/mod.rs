//! Tool catalog handling: schema sanitizing and function-declaration registry.

pub mod registry;
pub mod schema;

pub use registry::{to_definition, RegistrationError, ToolRegistry};
pub use schema::sanitize;
