//! Standard tool library.
//!
//! Small, side-effect-free tools used by the CLI demos and tests. Anything
//! touching the network, a database, or an interpreter belongs to the
//! embedding application, not here: such handlers are external collaborators
//! wired in through the registry like any other [`reagent_core::Tool`].

mod calc;
mod echo;
mod text;

pub use calc::CalcTool;
pub use echo::EchoTool;
pub use text::{TextCountTool, TextReverseTool, TextUppercaseTool};

use crate::registry::InMemoryToolRegistry;
use reagent_core::RegistryError;
use std::sync::Arc;

/// Registry preloaded with every standard tool, in a stable order.
pub fn standard_registry() -> Result<InMemoryToolRegistry, RegistryError> {
    InMemoryToolRegistry::new()
        .with_tool(Arc::new(EchoTool))?
        .with_tool(Arc::new(TextUppercaseTool))?
        .with_tool(Arc::new(TextReverseTool))?
        .with_tool(Arc::new(TextCountTool))?
        .with_tool(Arc::new(CalcTool))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ToolRegistry;

    #[test]
    fn standard_registry_order_is_stable() {
        let registry = standard_registry().unwrap();
        assert_eq!(
            registry.tool_names(),
            vec!["echo", "text_uppercase", "text_reverse", "text_count", "calc"]
        );
    }

    #[test]
    fn every_standard_tool_has_a_description() {
        let registry = standard_registry().unwrap();
        for tool in registry.tools() {
            assert!(
                !tool.description().is_empty(),
                "tool '{}' is missing a description",
                tool.name()
            );
        }
    }
}
