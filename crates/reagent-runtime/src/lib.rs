//! # Reagent Runtime
//!
//! The reasoning loop and its supporting pieces: prompt assembly in the
//! Thought/Action/Action Input/Final Answer grammar, tolerant parsing of
//! model output, bounded retries against the model transport, and the
//! round-based state machine that ties them together.
//!
//! One [`AgentLoop`] value serves any number of runs. Each call to
//! [`AgentLoop::run`] owns its transcript exclusively; the loop itself holds
//! only shared, read-only state, so independent runs may execute
//! concurrently from different threads.

pub mod cancel;
pub mod parser;
pub mod prompt;
pub mod retry;
pub mod runner;

pub use cancel::CancelToken;
pub use parser::{ActionParser, MalformedReason, ParsedOutcome};
pub use prompt::{DEFAULT_SYSTEM_INSTRUCTIONS, PromptAssembler};
pub use retry::RetryPolicy;
pub use runner::{AgentConfig, AgentLoop, RunError, RunOutcome, RunReport};
