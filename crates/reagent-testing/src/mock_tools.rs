//! Mock tools with predictable responses and call tracking.

use reagent_core::{ExecutionResult, Tool, ToolName};
use reagent_tools::{RegistryError, ToolRegistry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A tool that returns canned responses keyed by exact input.
///
/// Unmatched inputs fall through to the default response, or to a generic
/// echo of the input when no default is set. All calls are recorded for
/// later inspection.
#[derive(Debug)]
pub struct MockTool {
    name: String,
    description: String,
    responses: HashMap<String, ExecutionResult>,
    default_response: Option<ExecutionResult>,
    history: Mutex<Vec<String>>,
}

impl MockTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: "mock tool".to_string(),
            responses: HashMap::new(),
            default_response: None,
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Respond to `input` with a success carrying `output`.
    pub fn with_response(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.responses
            .insert(input.into(), ExecutionResult::success(output.into()));
        self
    }

    /// Respond to `input` with an in-band failure.
    pub fn with_failure(mut self, input: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(input.into(), ExecutionResult::failure(message.into()));
        self
    }

    /// Success returned for any unmatched input.
    pub fn with_default_response(mut self, output: impl Into<String>) -> Self {
        self.default_response = Some(ExecutionResult::success(output.into()));
        self
    }

    /// Failure returned for any unmatched input.
    pub fn with_default_failure(mut self, message: impl Into<String>) -> Self {
        self.default_response = Some(ExecutionResult::failure(message.into()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.history.lock().map(|h| h.len()).unwrap_or(0)
    }

    /// Inputs received, in call order.
    pub fn call_history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn was_called_with(&self, input: &str) -> bool {
        self.history
            .lock()
            .map(|h| h.iter().any(|i| i == input))
            .unwrap_or(false)
    }
}

impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn call(&self, input: String) -> ExecutionResult {
        if let Ok(mut history) = self.history.lock() {
            history.push(input.clone());
        }
        if let Some(response) = self.responses.get(&input) {
            response.clone()
        } else if let Some(default) = &self.default_response {
            default.clone()
        } else {
            ExecutionResult::success(format!("mock response for: {input}"))
        }
    }
}

/// An insertion-ordered registry of mock tools.
///
/// Behaves like the production registry but hands back the concrete
/// [`MockTool`] for inspection of call history.
#[derive(Default)]
pub struct MockToolRegistry {
    tools: Vec<Arc<MockTool>>,
    index: HashMap<ToolName, usize>,
}

impl MockToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock tool, keeping insertion order.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or duplicate name. Mock registries are built
    /// from literals in tests, where that is a bug in the test itself.
    pub fn with_tool(mut self, tool: MockTool) -> Self {
        let name = ToolName::parse(tool.name()).unwrap_or_else(|err| {
            panic!("invalid mock tool name '{}': {err}", tool.name());
        });
        if self.index.contains_key(&name) {
            panic!("duplicate mock tool name '{name}'");
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(Arc::new(tool));
        self
    }

    /// Shorthand for a tool that echoes a fixed string.
    pub fn with_success_tool(self, name: impl Into<String>, output: impl Into<String>) -> Self {
        self.with_tool(MockTool::new(name).with_default_response(output))
    }

    /// Shorthand for a tool that always fails in-band.
    pub fn with_failure_tool(self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_tool(MockTool::new(name).with_default_failure(message))
    }

    /// The concrete mock behind `name`, for asserting on call history.
    pub fn mock(&self, name: &str) -> Option<Arc<MockTool>> {
        let name = ToolName::parse(name).ok()?;
        self.index.get(&name).map(|&i| Arc::clone(&self.tools[i]))
    }
}

impl ToolRegistry for MockToolRegistry {
    fn get(&self, name: &ToolName) -> Result<Arc<dyn Tool>, RegistryError> {
        self.index
            .get(name)
            .map(|&i| Arc::clone(&self.tools[i]) as Arc<dyn Tool>)
            .ok_or_else(|| RegistryError::UnknownTool { name: name.clone() })
    }

    fn tools(&self) -> Box<dyn Iterator<Item = Arc<dyn Tool>> + '_> {
        Box::new(
            self.tools
                .iter()
                .map(|tool| Arc::clone(tool) as Arc<dyn Tool>),
        )
    }
}
