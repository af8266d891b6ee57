//! Tool trait and execution types.
//!
//! A [`Tool`] is a named capability the reasoning loop can invoke to produce
//! an observation. Tools receive a string input and return an
//! [`ExecutionResult`]; any I/O a tool performs is entirely its own concern.
//! The runtime only requires that the result be representable as text so it
//! can be fed back into the transcript.

use crate::identifiers::{NameError, ToolName};
use serde::{Deserialize, Serialize};

/// A request to invoke a specific tool with input data.
///
/// `ToolCall` represents the model's intent to use an external capability.
/// The tool name is validated at construction, so a `ToolCall` can always be
/// dispatched without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// The validated name of the tool to invoke.
    pub name: ToolName,

    /// The input data to pass to the tool.
    ///
    /// Tools are responsible for parsing and validating this input.
    pub input: String,
}

impl ToolCall {
    /// Create a new tool call, validating the name.
    pub fn new(name: &str, input: impl Into<String>) -> Result<Self, NameError> {
        Ok(Self {
            name: ToolName::parse(name)?,
            input: input.into(),
        })
    }

    /// Create a tool call from an already-validated name.
    pub fn from_validated(name: ToolName, input: impl Into<String>) -> Self {
        Self {
            name,
            input: input.into(),
        }
    }
}

/// Categorized failure reasons for tool execution.
///
/// Structured instead of a plain string so callers can react to failure
/// classes programmatically; `Display` renders the text that goes back into
/// the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureReason {
    /// Invalid or malformed input provided to the tool.
    InvalidInput { message: String },

    /// Required resource not found (file, table, key, ...).
    NotFound { resource: String },

    /// An I/O operation failed.
    Io { message: String },

    /// The tool exceeded its own execution deadline.
    Timeout { operation: String },

    /// The tool handler panicked; the panic was caught at the dispatch
    /// boundary and converted into this failure.
    Panic { message: String },

    /// Internal tool error or unexpected state.
    Internal { message: String },
}

impl FailureReason {
    /// Human-readable message for this failure.
    pub fn message(&self) -> String {
        match self {
            FailureReason::InvalidInput { message } => format!("Invalid input: {message}"),
            FailureReason::NotFound { resource } => format!("Not found: {resource}"),
            FailureReason::Io { message } => format!("I/O error: {message}"),
            FailureReason::Timeout { operation } => format!("Timeout: {operation}"),
            FailureReason::Panic { message } => format!("Tool panicked: {message}"),
            FailureReason::Internal { message } => format!("Internal error: {message}"),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The result of executing a tool.
///
/// Either successful execution with output, or failed execution with a
/// structured reason. A failure here is a recoverable, in-band condition:
/// the loop feeds the failure text back to the model as an observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// Tool executed successfully with the given output.
    Success { output: String },

    /// Tool execution failed with a structured reason.
    Failure { reason: FailureReason },
}

impl ExecutionResult {
    /// Create a successful execution result.
    pub fn success(output: impl Into<String>) -> Self {
        ExecutionResult::Success {
            output: output.into(),
        }
    }

    /// Create a failed execution result with a structured reason.
    pub fn failed(reason: FailureReason) -> Self {
        ExecutionResult::Failure { reason }
    }

    /// Create a failed execution result from a plain error message.
    ///
    /// The message is wrapped in [`FailureReason::Internal`].
    pub fn failure(message: impl Into<String>) -> Self {
        ExecutionResult::Failure {
            reason: FailureReason::Internal {
                message: message.into(),
            },
        }
    }

    /// Check if the execution was successful.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// The observation text for this result: the output on success, the
    /// failure message otherwise.
    pub fn text(&self) -> String {
        match self {
            ExecutionResult::Success { output } => output.clone(),
            ExecutionResult::Failure { reason } => reason.message(),
        }
    }

    /// The successful output, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success { output } => Some(output),
            ExecutionResult::Failure { .. } => None,
        }
    }
}

/// An invocable capability exposed to the reasoning loop.
///
/// Implementations must be thread-safe (`Send + Sync`): a registry is shared
/// read-only across concurrent runs.
///
/// # Example
///
/// ```rust
/// use reagent_core::{ExecutionResult, FailureReason, Tool};
///
/// struct Doubler;
///
/// impl Tool for Doubler {
///     fn name(&self) -> &str {
///         "double"
///     }
///
///     fn description(&self) -> &str {
///         "Multiplies a number by 2"
///     }
///
///     fn call(&self, input: String) -> ExecutionResult {
///         match input.trim().parse::<f64>() {
///             Ok(n) => ExecutionResult::success((n * 2.0).to_string()),
///             Err(_) => ExecutionResult::failed(FailureReason::InvalidInput {
///                 message: format!("not a number: {input}"),
///             }),
///         }
///     }
/// }
/// ```
pub trait Tool: Send + Sync {
    /// The unique name the registry routes calls by.
    fn name(&self) -> &str;

    /// Human-readable description, rendered into the model-facing tool
    /// catalog. Override this so the model knows when to pick the tool.
    fn description(&self) -> &str {
        ""
    }

    /// JSON Schema for the tool's input.
    ///
    /// `None` means the tool accepts free-form text.
    fn input_schema(&self) -> Option<serde_json::Value> {
        None
    }

    /// Execute the tool with the provided input.
    ///
    /// Errors belong inside the returned [`ExecutionResult`]; panics are
    /// caught at the dispatch boundary but indicate a tool bug.
    fn call(&self, input: String) -> ExecutionResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn call(&self, input: String) -> ExecutionResult {
            ExecutionResult::success(input)
        }
    }

    #[test]
    fn tool_call_validates_name() {
        assert!(ToolCall::new("echo", "hi").is_ok());
        assert!(ToolCall::new("bad name", "hi").is_err());
    }

    #[test]
    fn execution_result_text_covers_both_variants() {
        let ok = EchoTool.call("hello".to_string());
        assert!(ok.is_success());
        assert_eq!(ok.text(), "hello");
        assert_eq!(ok.output(), Some("hello"));

        let failed = ExecutionResult::failed(FailureReason::NotFound {
            resource: "table users".to_string(),
        });
        assert!(!failed.is_success());
        assert_eq!(failed.text(), "Not found: table users");
        assert_eq!(failed.output(), None);
    }

    #[test]
    fn failure_reason_serializes_tagged() {
        let reason = FailureReason::Timeout {
            operation: "query".to_string(),
        };
        let json = serde_json::to_string(&reason).unwrap();
        assert!(json.contains("\"type\":\"timeout\""));
    }
}
