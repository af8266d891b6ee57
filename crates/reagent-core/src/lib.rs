//! # Reagent Core
//!
//! Core traits and types for the Reagent reasoning-loop runtime.
//! This crate defines the data model shared by every other crate in the
//! workspace: validated tool names, the [`Tool`] capability boundary, the
//! [`Transcript`] of a single run, and the [`ModelClient`] seam behind which
//! an actual text-generation provider lives.
//!
//! Nothing in this crate performs I/O. Tools and model clients are injected
//! by the caller; the runtime crate orchestrates them.

pub mod error;
pub mod identifiers;
pub mod model;
pub mod tool;
pub mod transcript;

pub use error::{AssemblyError, ReagentError, ReagentResult, RegistryError};
pub use identifiers::{NameError, ToolName};
pub use model::{ChunkStream, Completion, CompletionChunk, CompletionRequest, ModelClient, ModelError};
pub use tool::{ExecutionResult, FailureReason, Tool, ToolCall};
pub use transcript::{Transcript, Turn};
