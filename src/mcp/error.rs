use std::io;
use thiserror::Error;

/// Fatal transport failures. None of these are retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to launch tool provider '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Tool provider {0} pipe unavailable")]
    MissingPipe(&'static str),

    #[error("Failed to encode '{method}' message: {source}")]
    Encode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write '{method}' to tool provider: {source}")]
    Write {
        method: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read response to '{method}': {source}")]
    Read {
        method: String,
        #[source]
        source: io::Error,
    },

    #[error("Tool provider didn't respond to '{method}'")]
    NoResponse { method: String },

    #[error("Malformed response to '{method}': {source}")]
    MalformedResponse {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response id {actual} does not match request id {expected}")]
    UnexpectedId {
        expected: u64,
        actual: serde_json::Value,
    },

    #[error("Tool provider is not running")]
    NotStarted,

    #[error("Tool provider is already running")]
    AlreadyStarted,
}
