//! # Reagent Tools
//!
//! Tool registry implementations and a small standard tool library for the
//! Reagent runtime.
//!
//! The registry preserves registration order, which is the order tools are
//! presented to the model, and rejects duplicate names. Dispatch
//! converts tool panics into failed results so a buggy tool degrades into an
//! observation the model can react to instead of tearing down the run.

pub mod registry;
/// Standard tool library: echo, text transforms, arithmetic.
pub mod standard;

pub use registry::{InMemoryToolRegistry, ToolRegistry};
pub use reagent_core::{ExecutionResult, RegistryError, Tool, ToolCall, ToolName};
pub use standard::{CalcTool, EchoTool, TextCountTool, TextReverseTool, TextUppercaseTool};
