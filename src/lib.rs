//! # Reagent
//!
//! Reagent is a round-based tool-dispatch loop for language-model agents.
//! A model proposes actions in a tagged plain-text grammar, the runtime
//! dispatches them against a registry of tools, and the results are fed
//! back as observations until the model commits to a final answer.
//!
//! ## Core Components
//!
//! - **[Tool]** and **[ToolRegistry]**: named capabilities and the ordered
//!   registry the loop routes calls through
//! - **[ModelClient]**: the single seam to a language model backend
//! - **[PromptAssembler]** and **[ActionParser]**: the deterministic text
//!   boundary between transcript state and untrusted model output
//! - **[AgentLoop]**: the orchestrator that runs rounds to a [`RunOutcome`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reagent::{AgentConfig, AgentLoop, standard_registry};
//! # fn model() -> impl reagent::ModelClient {
//! #     struct C;
//! #     impl reagent::ModelClient for C {
//! #         fn complete(&self, _: &reagent::CompletionRequest)
//! #             -> Result<reagent::Completion, reagent::ModelError>
//! #         { Ok(reagent::Completion::new("Final Answer: desserts")) }
//! #     }
//! #     C
//! # }
//!
//! let registry = standard_registry().unwrap();
//! let agent = AgentLoop::new(model(), registry, AgentConfig::default());
//!
//! let report = agent.run("Reverse the word 'stressed'").unwrap();
//! if let Some(answer) = report.outcome.final_text() {
//!     println!("{answer}");
//! }
//! ```

pub use reagent_core::{
    AssemblyError, ChunkStream, Completion, CompletionChunk, CompletionRequest, ExecutionResult,
    FailureReason,
    ModelClient, ModelError, NameError, ReagentError, ReagentResult, RegistryError, Tool, ToolCall,
    ToolName, Transcript, Turn,
};
pub use reagent_runtime::{
    ActionParser, AgentConfig, AgentLoop, CancelToken, DEFAULT_SYSTEM_INSTRUCTIONS,
    MalformedReason, ParsedOutcome, PromptAssembler, RetryPolicy, RunError, RunOutcome, RunReport,
};
pub use reagent_tools::{InMemoryToolRegistry, ToolRegistry, standard::standard_registry};
