//! Prompt assembly.
//!
//! Renders the current transcript and tool registry into a model-facing
//! [`CompletionRequest`] using the classic ReAct grammar: the model is
//! instructed to reply with `Thought:`, `Action:`, `Action Input:`, and
//! eventually `Final Answer:` tagged lines.
//!
//! Assembly is deterministic: identical transcript and registry contents
//! produce byte-identical requests. Nothing here consults clocks, random
//! sources, or global state.

use reagent_core::{AssemblyError, CompletionRequest, Transcript, Turn};
use reagent_tools::ToolRegistry;

/// Default preamble placed before the tool catalog.
pub const DEFAULT_SYSTEM_INSTRUCTIONS: &str =
    "Answer the following questions as best you can. You have access to the following tools:";

/// Default cap on rendered observation length, in characters.
pub const DEFAULT_MAX_OBSERVATION_LEN: usize = 4096;

/// Renders transcript + registry into a [`CompletionRequest`].
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_instructions: String,
    max_observation_len: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self {
            system_instructions: DEFAULT_SYSTEM_INSTRUCTIONS.to_string(),
            max_observation_len: DEFAULT_MAX_OBSERVATION_LEN,
        }
    }
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default preamble.
    pub fn with_system_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.system_instructions = instructions.into();
        self
    }

    /// Cap rendered observations at `len` characters.
    ///
    /// The transcript keeps the full observation; only the rendering is
    /// clipped, with a `... [truncated]` marker.
    pub fn with_max_observation_len(mut self, len: usize) -> Self {
        self.max_observation_len = len;
        self
    }

    /// Assemble a model request from the transcript and registry.
    ///
    /// Fails if the transcript is empty, does not begin with the user's
    /// goal, or contains an action request with no matching observation.
    /// All three indicate orchestration bugs, not model misbehavior.
    pub fn assemble(
        &self,
        transcript: &Transcript,
        registry: &dyn ToolRegistry,
    ) -> Result<CompletionRequest, AssemblyError> {
        if transcript.is_empty() {
            return Err(AssemblyError::EmptyTranscript);
        }
        if transcript.goal().is_none() {
            return Err(AssemblyError::MissingGoal);
        }
        if let Some(tool) = transcript.open_action() {
            return Err(AssemblyError::UnterminatedAction { tool: tool.clone() });
        }

        Ok(CompletionRequest {
            system_instructions: self.system_instructions.clone(),
            tool_catalog: self.render_catalog(registry),
            transcript_text: self.render_transcript(transcript),
        })
    }

    fn render_catalog(&self, registry: &dyn ToolRegistry) -> String {
        let mut names = Vec::new();
        let mut catalog = String::new();
        for tool in registry.tools() {
            catalog.push_str(tool.name());
            catalog.push_str(": ");
            catalog.push_str(tool.description());
            if let Some(schema) = tool.input_schema() {
                catalog.push_str(" (input schema: ");
                catalog.push_str(&schema.to_string());
                catalog.push(')');
            }
            catalog.push('\n');
            names.push(tool.name().to_string());
        }

        catalog.push_str(&format!(
            "\nUse the following format:\n\n\
             Question: the input question you must answer\n\
             Thought: you should always think about what to do\n\
             Action: the action to take, should be one of [{}]\n\
             Action Input: the input to the action\n\
             Observation: the result of the action\n\
             ... (this Thought/Action/Action Input/Observation can repeat N times)\n\
             Thought: I now know the final answer\n\
             Final Answer: the final answer to the original question",
            names.join(", ")
        ));
        catalog
    }

    fn render_transcript(&self, transcript: &Transcript) -> String {
        let mut text = String::new();
        for turn in transcript {
            match turn {
                Turn::UserInput { text: goal } => {
                    text.push_str("Question: ");
                    text.push_str(goal);
                    text.push('\n');
                }
                Turn::ModelThought { text: thought } => {
                    text.push_str("Thought: ");
                    text.push_str(thought);
                    text.push('\n');
                }
                Turn::ActionRequest { tool, input } => {
                    text.push_str("Action: ");
                    text.push_str(tool.as_str());
                    text.push_str("\nAction Input: ");
                    text.push_str(input);
                    text.push('\n');
                }
                Turn::Observation { content, .. } => {
                    text.push_str("Observation: ");
                    text.push_str(&self.clip(content));
                    text.push('\n');
                }
                Turn::FinalAnswer { text: answer } => {
                    text.push_str("Final Answer: ");
                    text.push_str(answer);
                    text.push('\n');
                }
            }
        }
        // Cue the model's next reasoning step.
        if !matches!(transcript.last(), Some(Turn::FinalAnswer { .. })) {
            text.push_str("Thought:");
        }
        text
    }

    // Char-boundary clip that won't panic on multi-byte input.
    fn clip(&self, s: &str) -> String {
        if s.chars().count() <= self.max_observation_len {
            s.to_string()
        } else {
            let clipped: String = s.chars().take(self.max_observation_len).collect();
            format!("{clipped}... [truncated]")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reagent_core::ToolName;
    use reagent_tools::InMemoryToolRegistry;
    use reagent_tools::standard::standard_registry;

    fn transcript_with_goal(goal: &str) -> Transcript {
        let mut t = Transcript::new();
        t.push(Turn::UserInput {
            text: goal.to_string(),
        });
        t
    }

    #[test]
    fn assembly_is_deterministic() {
        let registry = standard_registry().unwrap();
        let mut t = transcript_with_goal("reverse 'abc'");
        t.push(Turn::ActionRequest {
            tool: ToolName::parse("text_reverse").unwrap(),
            input: "abc".to_string(),
        });
        t.push(Turn::observation(
            ToolName::parse("text_reverse").unwrap(),
            "cba",
            false,
        ));

        let assembler = PromptAssembler::new();
        let a = assembler.assemble(&t, &registry).unwrap();
        let b = assembler.assemble(&t, &registry).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rendered(), b.rendered());
    }

    #[test]
    fn empty_transcript_is_rejected() {
        let registry = InMemoryToolRegistry::new();
        let err = PromptAssembler::new()
            .assemble(&Transcript::new(), &registry)
            .unwrap_err();
        assert_eq!(err, AssemblyError::EmptyTranscript);
    }

    #[test]
    fn transcript_without_goal_is_rejected() {
        let registry = InMemoryToolRegistry::new();
        let mut t = Transcript::new();
        t.push(Turn::ModelThought {
            text: "hm".to_string(),
        });
        let err = PromptAssembler::new().assemble(&t, &registry).unwrap_err();
        assert_eq!(err, AssemblyError::MissingGoal);
    }

    #[test]
    fn unterminated_action_is_rejected() {
        let registry = standard_registry().unwrap();
        let mut t = transcript_with_goal("goal");
        t.push(Turn::ActionRequest {
            tool: ToolName::parse("echo").unwrap(),
            input: "hi".to_string(),
        });

        let err = PromptAssembler::new().assemble(&t, &registry).unwrap_err();
        assert!(matches!(
            err,
            AssemblyError::UnterminatedAction { tool } if tool.as_str() == "echo"
        ));
    }

    #[test]
    fn catalog_lists_tools_in_registration_order() {
        let registry = standard_registry().unwrap();
        let request = PromptAssembler::new()
            .assemble(&transcript_with_goal("goal"), &registry)
            .unwrap();

        let echo_pos = request.tool_catalog.find("echo:").unwrap();
        let calc_pos = request.tool_catalog.find("calc:").unwrap();
        assert!(echo_pos < calc_pos);
        assert!(request.tool_catalog.contains("should be one of [echo,"));
    }

    #[test]
    fn oversized_observation_is_clipped_in_rendering_only() {
        let registry = standard_registry().unwrap();
        let big = "x".repeat(100);
        let mut t = transcript_with_goal("goal");
        t.push(Turn::ActionRequest {
            tool: ToolName::parse("echo").unwrap(),
            input: "big".to_string(),
        });
        t.push(Turn::observation(
            ToolName::parse("echo").unwrap(),
            big.clone(),
            false,
        ));

        let assembler = PromptAssembler::new().with_max_observation_len(10);
        let request = assembler.assemble(&t, &registry).unwrap();
        assert!(request.transcript_text.contains("xxxxxxxxxx... [truncated]"));
        assert!(!request.transcript_text.contains(&big));

        // The transcript itself still holds the full content.
        match t.last().unwrap() {
            Turn::Observation { content, .. } => assert_eq!(content, &big),
            _ => panic!("expected observation"),
        }
    }

    #[test]
    fn transcript_rendering_ends_with_thought_cue() {
        let registry = standard_registry().unwrap();
        let request = PromptAssembler::new()
            .assemble(&transcript_with_goal("goal"), &registry)
            .unwrap();
        assert!(request.transcript_text.ends_with("Thought:"));
    }
}
