use reagent_core::{ExecutionResult, Tool};

/// Identity tool: returns its input unchanged.
///
/// Useful as a minimal end-to-end check that dispatch and observation
/// plumbing work.
pub struct EchoTool;

impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Returns the input text unchanged"
    }

    fn call(&self, input: String) -> ExecutionResult {
        ExecutionResult::success(input)
    }
}
