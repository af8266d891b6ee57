//! Error types shared across the workspace.
//!
//! The taxonomy follows one rule: conditions the model can recover from
//! (tool failures, malformed output) are data, not errors; they travel
//! through the transcript as observations. The types here cover everything
//! else: registry misuse, transcript invariant violations, and the
//! umbrella [`ReagentError`] for callers that want a single error type.

use crate::identifiers::{NameError, ToolName};
use crate::model::ModelError;

/// Errors from tool registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A tool with the same name is already registered.
    #[error("tool '{name}' is already registered")]
    DuplicateTool { name: ToolName },

    /// No tool with the given name exists in the registry.
    #[error("tool '{name}' not found in registry")]
    UnknownTool { name: ToolName },

    /// A tool reported a name that fails validation.
    #[error("invalid tool name: {0}")]
    InvalidName(#[from] NameError),
}

/// Invariant violations detected while assembling a prompt.
///
/// These always indicate a bug in the orchestration logic, never an
/// environmental condition, so they abort the run immediately.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    /// The transcript has no turns.
    #[error("cannot assemble a prompt from an empty transcript")]
    EmptyTranscript,

    /// The transcript does not begin with the user's goal.
    #[error("transcript does not begin with user input")]
    MissingGoal,

    /// An action request has no matching observation.
    #[error("action request for '{tool}' has no matching observation")]
    UnterminatedAction { tool: ToolName },
}

/// Top-level error for callers that do not need to distinguish sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReagentError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("name error: {0}")]
    Name(#[from] NameError),
}

/// Result alias using [`ReagentError`].
pub type ReagentResult<T> = Result<T, ReagentError>;
