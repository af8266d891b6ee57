//! Tool registry implementations.

use reagent_core::{ExecutionResult, FailureReason, RegistryError, Tool, ToolCall, ToolName};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Trait for managing and dispatching tool calls.
///
/// Registries maintain the set of invocable capabilities and route incoming
/// tool calls to the right implementation. Lookup failures are errors;
/// execution failures are data ([`ExecutionResult::Failure`]) because the
/// model is expected to recover from them.
pub trait ToolRegistry {
    /// Look up a tool by name.
    fn get(&self, name: &ToolName) -> Result<Arc<dyn Tool>, RegistryError>;

    /// Lazily iterate over all tools in registration order.
    ///
    /// The iterator is restartable: calling `tools()` again yields the same
    /// sequence.
    fn tools(&self) -> Box<dyn Iterator<Item = Arc<dyn Tool>> + '_>;

    /// Whether a tool with the given name is registered.
    fn contains(&self, name: &ToolName) -> bool {
        self.get(name).is_ok()
    }

    /// Look up and execute a tool in one step.
    ///
    /// A panicking handler is caught and converted into
    /// [`FailureReason::Panic`] so it surfaces as a failed observation
    /// rather than unwinding through the loop.
    fn dispatch(&self, call: &ToolCall) -> Result<ExecutionResult, RegistryError> {
        let tool = self.get(&call.name)?;
        Ok(run_guarded(tool.as_ref(), call.input.clone()))
    }
}

fn run_guarded(tool: &dyn Tool, input: String) -> ExecutionResult {
    match catch_unwind(AssertUnwindSafe(|| tool.call(input))) {
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(tool = tool.name(), %message, "tool handler panicked");
            ExecutionResult::failed(FailureReason::Panic { message })
        }
    }
}

/// In-memory tool registry preserving registration order.
///
/// Tools are stored in an ordered list with a name index for O(1) lookup.
/// Registration order matters: it is the order tools are described to the
/// model, so it must be stable across runs.
///
/// # Example
///
/// ```rust
/// use reagent_tools::{EchoTool, InMemoryToolRegistry, ToolRegistry};
/// use reagent_core::{ToolCall, ToolName};
/// use std::sync::Arc;
///
/// let registry = InMemoryToolRegistry::new()
///     .with_tool(Arc::new(EchoTool))
///     .unwrap();
///
/// let call = ToolCall::new("echo", "hello").unwrap();
/// let result = registry.dispatch(&call).unwrap();
/// assert_eq!(result.text(), "hello");
///
/// let missing = ToolName::parse("nonexistent").unwrap();
/// assert!(registry.get(&missing).is_err());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<ToolName, usize>,
}

impl InMemoryToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its reported name.
    ///
    /// Fails with [`RegistryError::DuplicateTool`] if a tool with the same
    /// name is already present, and [`RegistryError::InvalidName`] if the
    /// tool reports a name that does not validate.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = ToolName::parse(tool.name())?;
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool { name });
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Register a tool using the builder pattern.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, RegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    /// Names of all registered tools, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl ToolRegistry for InMemoryToolRegistry {
    fn get(&self, name: &ToolName) -> Result<Arc<dyn Tool>, RegistryError> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.tools[i]))
            .ok_or_else(|| RegistryError::UnknownTool { name: name.clone() })
    }

    fn tools(&self) -> Box<dyn Iterator<Item = Arc<dyn Tool>> + '_> {
        Box::new(self.tools.iter().cloned())
    }
}
