//! The agent loop
//!
//! Turns one natural-language task into a bounded sequence of engine calls
//! interleaved with tool calls:
//!
//! ```text
//! Start ──> Awaiting ──Text──────────> Answer
//!             │  ^   ──Empty─────────> NoResponse
//!             │  │   ──Malformed─────> Malformed
//!   ToolCall  │  │ result fed back
//!             v  │
//!           invoke tool          cap reached ──> IterationLimit
//! ```
//!
//! Engine call failures end the task immediately; tool failures do not.

mod config;
mod orchestrator;
mod outcome;

pub use config::{AgentConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TEMPERATURE};
pub use orchestrator::PullRequestAgent;
pub use outcome::{EngineStage, TaskOutcome, ITERATION_LIMIT_SENTINEL, NO_RESPONSE_MESSAGE};
