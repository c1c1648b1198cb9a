use std::fmt;

/// Returned when the round-trip cap is hit without a textual answer
pub const ITERATION_LIMIT_SENTINEL: &str = "Iteration limit reached!";
pub const NO_RESPONSE_MESSAGE: &str = "No response from model";

/// Which engine call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStage {
    /// The first call, carrying only the task
    Initial,
    /// A follow-up call after a tool result
    Conversation,
}

/// How a task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Answer(String),
    NoResponse,
    Malformed(String),
    IterationLimit,
    EngineError { stage: EngineStage, message: String },
}

impl TaskOutcome {
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer(_))
    }

    /// The single string handed back to callers
    pub fn into_message(self) -> String {
        match self {
            Self::Answer(text) => text,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answer(text) => f.write_str(text),
            Self::NoResponse => f.write_str(NO_RESPONSE_MESSAGE),
            Self::Malformed(reason) => write!(f, "Model returned an unsupported response: {}", reason),
            Self::IterationLimit => f.write_str(ITERATION_LIMIT_SENTINEL),
            Self::EngineError {
                stage: EngineStage::Initial,
                message,
            } => write!(f, "An error occurred while generating content: {}", message),
            Self::EngineError {
                stage: EngineStage::Conversation,
                message,
            } => write!(f, "An error occurred during conversation: {}", message),
        }
    }
}
