//! Property-Based Tests for Parser Totality and Loop Termination
//!
//! These tests verify invariants that must hold for arbitrary input:
//! the parser never panics or errors on any model output, tool names
//! round-trip through validation, prompt assembly is deterministic, and
//! the loop always terminates within its round budget.

use proptest::prelude::*;
use reagent::{
    ActionParser, AgentConfig, AgentLoop, Completion, CompletionRequest, ModelClient, ModelError,
    ParsedOutcome, PromptAssembler, RetryPolicy, ToolName, Transcript, Turn, standard_registry,
};
use std::num::NonZeroU32;

// Strategy for generating valid tool names
fn tool_name_strategy() -> impl Strategy<Value = ToolName> {
    prop::string::string_regex("[a-zA-Z0-9_.-]{1,64}")
        .unwrap()
        .prop_filter_map("Valid tool name", |s| ToolName::parse(&s).ok())
}

/// A model that emits arbitrary pregenerated text, cycling when exhausted.
struct ArbitraryModel {
    outputs: Vec<String>,
    cursor: std::sync::atomic::AtomicUsize,
}

impl ModelClient for ArbitraryModel {
    fn complete(&self, _request: &CompletionRequest) -> Result<Completion, ModelError> {
        let i = self
            .cursor
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Ok(Completion::new(
            self.outputs[i % self.outputs.len()].clone(),
        ))
    }
}

proptest! {
    /// Property: the parser is total - any string produces a ParsedOutcome,
    /// never a panic.
    #[test]
    fn prop_parser_never_panics(text in ".*") {
        let registry = standard_registry().unwrap();
        let _ = ActionParser::new().parse(&Completion::new(text), &registry);
    }

    /// Property: a well-formed action line naming a registered tool always
    /// parses as that action, whatever the input text contains (as long as
    /// it stays on one line and carries no grammar tags).
    #[test]
    fn prop_well_formed_action_parses(input in "[a-zA-Z0-9 ]{0,80}") {
        let registry = standard_registry().unwrap();
        let text = format!("Action: echo\nAction Input: {input}");
        let outcome = ActionParser::new().parse(&Completion::new(text), &registry);
        match outcome {
            ParsedOutcome::Action { call, .. } => {
                prop_assert_eq!(call.name.as_str(), "echo");
                prop_assert_eq!(call.input, input.trim());
            }
            other => prop_assert!(false, "expected action, got {:?}", other),
        }
    }

    /// Property: valid names round-trip through parse unchanged.
    #[test]
    fn prop_tool_name_round_trips(name in tool_name_strategy()) {
        let reparsed = ToolName::parse(name.as_str()).unwrap();
        prop_assert_eq!(name, reparsed);
    }

    /// Property: assembling the same transcript twice yields byte-identical
    /// requests.
    #[test]
    fn prop_assembly_is_deterministic(
        goal in ".{1,100}",
        observation in ".{0,200}",
    ) {
        let registry = standard_registry().unwrap();
        let mut transcript = Transcript::new();
        transcript.push(Turn::UserInput { text: goal });
        transcript.push(Turn::ActionRequest {
            tool: ToolName::parse("echo").unwrap(),
            input: "x".to_string(),
        });
        transcript.push(Turn::observation(
            ToolName::parse("echo").unwrap(),
            observation,
            false,
        ));

        let assembler = PromptAssembler::new();
        let a = assembler.assemble(&transcript, &registry).unwrap();
        let b = assembler.assemble(&transcript, &registry).unwrap();
        prop_assert_eq!(a.rendered(), b.rendered());
    }

    /// Property: whatever the model emits, a run terminates within its
    /// round budget and reports a round count inside it.
    #[test]
    fn prop_loop_always_terminates(
        outputs in prop::collection::vec(".{0,120}", 1..4),
        max_rounds in 1u32..6,
    ) {
        let model = ArbitraryModel {
            outputs,
            cursor: std::sync::atomic::AtomicUsize::new(0),
        };
        let config = AgentConfig {
            max_rounds: NonZeroU32::new(max_rounds).unwrap(),
            retry: RetryPolicy::none(),
            ..AgentConfig::default()
        };
        let agent = AgentLoop::new(model, standard_registry().unwrap(), config);

        let report = agent.run("goal").unwrap();
        prop_assert!(report.rounds <= max_rounds);
    }
}
