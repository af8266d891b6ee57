//! The reasoning loop.
//!
//! [`AgentLoop`] orchestrates rounds of assemble → call model → parse →
//! dispatch → observe until the model produces a final answer or a budget
//! runs out. Within a run the steps are strictly sequential: round N+1
//! never starts before round N's observation is appended, because each
//! round's prompt is built from the previous round's output.
//!
//! Error policy, in one place:
//! - Tool failures and malformed model output are fed back to the model as
//!   observations (recoverable, in-band).
//! - Exhausted budgets are normal terminal outcomes ([`RunOutcome`]), not
//!   errors.
//! - Transport failures that survive the retry policy, and transcript
//!   invariant violations, abort the run as [`RunError`].

use crate::cancel::CancelToken;
use crate::parser::{ActionParser, MalformedReason, ParsedOutcome};
use crate::prompt::{DEFAULT_MAX_OBSERVATION_LEN, PromptAssembler};
use crate::retry::{RetryPolicy, complete_with_retry};
use chrono::{DateTime, Utc};
use reagent_core::{AssemblyError, ModelClient, ModelError, Transcript, Turn};
use reagent_tools::ToolRegistry;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

/// Immutable configuration for a loop.
///
/// One config value serves any number of runs; it is never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Maximum rounds per run. The round counter never exceeds this.
    pub max_rounds: NonZeroU32,

    /// Maximum consecutive rounds of unparseable or unknown-tool output
    /// before the run is abandoned. Resets whenever a round parses into a
    /// known action or a final answer.
    pub malformed_limit: u32,

    /// Retry policy for model transport failures.
    pub retry: RetryPolicy,

    /// Cap on rendered observation length, in characters.
    pub max_observation_len: usize,

    /// Preamble override for the prompt assembler.
    pub system_instructions: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: const { NonZeroU32::new(16).unwrap() },
            malformed_limit: 3,
            retry: RetryPolicy::default(),
            max_observation_len: DEFAULT_MAX_OBSERVATION_LEN,
            system_instructions: None,
        }
    }
}

/// Terminal state of a run. All variants are normal results reported to the
/// caller; none is an exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The model produced a final answer.
    FinalAnswer { text: String },

    /// A budget ran out: the round counter reached its limit, or the model
    /// kept producing unparseable output.
    BudgetExceeded,

    /// The model repeatedly named tools that do not exist. `tool` is the
    /// last hallucinated name.
    ToolDispatchFailure { tool: String },

    /// Cancellation was requested and observed at a round boundary.
    Cancelled,
}

impl RunOutcome {
    /// Whether the run ended with a final answer.
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::FinalAnswer { .. })
    }

    /// The final answer text, if any.
    pub fn final_text(&self) -> Option<&str> {
        match self {
            RunOutcome::FinalAnswer { text } => Some(text),
            _ => None,
        }
    }
}

/// Everything a caller gets back from a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Full history of the run, including corrective observations.
    pub transcript: Transcript,
    /// Rounds actually executed.
    pub rounds: u32,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// Fatal failures that abort a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// Transcript invariant violation: a core logic bug, aborts immediately.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Model transport failure that survived the retry policy.
    #[error("model transport failed: {0}")]
    Model(#[from] ModelError),
}

/// The round-based reasoning loop.
///
/// Holds only shared read-only state; every run owns its transcript
/// exclusively, so independent runs may execute concurrently against one
/// `AgentLoop` from different threads.
///
/// # Example
///
/// ```rust,no_run
/// use reagent_runtime::{AgentConfig, AgentLoop};
/// use reagent_tools::standard::standard_registry;
/// # fn client() -> impl reagent_core::ModelClient { struct C; impl reagent_core::ModelClient for C {
/// #   fn complete(&self, _: &reagent_core::CompletionRequest)
/// #     -> Result<reagent_core::Completion, reagent_core::ModelError>
/// #   { Ok(reagent_core::Completion::new("Final Answer: done")) } } C }
///
/// let registry = standard_registry().unwrap();
/// let agent = AgentLoop::new(client(), registry, AgentConfig::default());
/// let report = agent.run("Reverse the word 'stressed'").unwrap();
/// println!("{:?}", report.outcome);
/// ```
pub struct AgentLoop<M, R> {
    model: M,
    registry: R,
    config: AgentConfig,
    assembler: PromptAssembler,
    parser: ActionParser,
}

impl<M, R> AgentLoop<M, R>
where
    M: ModelClient,
    R: ToolRegistry,
{
    pub fn new(model: M, registry: R, config: AgentConfig) -> Self {
        let mut assembler =
            PromptAssembler::new().with_max_observation_len(config.max_observation_len);
        if let Some(instructions) = &config.system_instructions {
            assembler = assembler.with_system_instructions(instructions.clone());
        }
        Self {
            model,
            registry,
            config,
            assembler,
            parser: ActionParser::new(),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run to termination with no external cancellation.
    pub fn run(&self, goal: impl Into<String>) -> Result<RunReport, RunError> {
        self.run_with_cancel(goal, &CancelToken::new())
    }

    /// Run to termination, observing `cancel` at round boundaries.
    pub fn run_with_cancel(
        &self,
        goal: impl Into<String>,
        cancel: &CancelToken,
    ) -> Result<RunReport, RunError> {
        let goal = goal.into();
        let started_at = Utc::now();
        let clock = Instant::now();
        let span = tracing::info_span!("agent_run", max_rounds = self.config.max_rounds.get());
        let _guard = span.enter();

        let mut transcript = Transcript::new();
        transcript.push(Turn::UserInput { text: goal });

        let mut rounds: u32 = 0;
        let mut malformed_streak: u32 = 0;

        let outcome = loop {
            if cancel.is_cancelled() {
                tracing::info!(rounds, "run cancelled at round boundary");
                break RunOutcome::Cancelled;
            }
            if rounds >= self.config.max_rounds.get() {
                tracing::info!(rounds, "round budget exhausted");
                break RunOutcome::BudgetExceeded;
            }
            rounds += 1;

            let request = self.assembler.assemble(&transcript, &self.registry)?;
            let completion =
                complete_with_retry(&self.model, &request, &self.config.retry, cancel)?;

            match self.parser.parse(&completion, &self.registry) {
                ParsedOutcome::Final { thought, text } => {
                    tracing::debug!(round = rounds, "final answer produced");
                    if let Some(thought) = thought {
                        transcript.push(Turn::ModelThought { text: thought });
                    }
                    transcript.push(Turn::FinalAnswer { text: text.clone() });
                    break RunOutcome::FinalAnswer { text };
                }
                ParsedOutcome::Action { thought, call } => {
                    malformed_streak = 0;
                    tracing::debug!(round = rounds, tool = call.name.as_str(), "dispatching tool");
                    if let Some(thought) = thought {
                        transcript.push(Turn::ModelThought { text: thought });
                    }
                    transcript.push(Turn::ActionRequest {
                        tool: call.name.clone(),
                        input: call.input.clone(),
                    });

                    // Tool errors stay in-band: the text goes back to the
                    // model as an observation so it can self-correct.
                    let (content, is_error) = match self.registry.dispatch(&call) {
                        Ok(result) => (result.text(), !result.is_success()),
                        Err(err) => (err.to_string(), true),
                    };
                    transcript.push(Turn::observation(call.name, content, is_error));
                }
                ParsedOutcome::Malformed { reason, .. } => {
                    malformed_streak += 1;
                    tracing::debug!(
                        round = rounds,
                        streak = malformed_streak,
                        reason = %reason,
                        "completion did not parse"
                    );
                    let hallucinated = match &reason {
                        MalformedReason::UnknownTool { name }
                        | MalformedReason::InvalidToolName { name } => Some(name.clone()),
                        _ => None,
                    };
                    transcript.push(Turn::corrective(self.corrective_message(&reason)));

                    if malformed_streak >= self.config.malformed_limit.max(1) {
                        break match hallucinated {
                            Some(tool) => RunOutcome::ToolDispatchFailure { tool },
                            None => RunOutcome::BudgetExceeded,
                        };
                    }
                }
            }
        };

        tracing::info!(rounds, ?outcome, "run terminated");
        Ok(RunReport {
            outcome,
            transcript,
            rounds,
            started_at,
            elapsed: clock.elapsed(),
        })
    }

    fn corrective_message(&self, reason: &MalformedReason) -> String {
        match reason {
            MalformedReason::UnknownTool { name } | MalformedReason::InvalidToolName { name } => {
                let names: Vec<String> = self
                    .registry
                    .tools()
                    .map(|t| t.name().to_string())
                    .collect();
                format!(
                    "Tool '{}' is not available. Choose one of: [{}]",
                    name,
                    names.join(", ")
                )
            }
            MalformedReason::Empty | MalformedReason::MissingAction => {
                "Could not parse your response. Reply with an 'Action:' line naming one of \
                 the available tools and an 'Action Input:' line, or a 'Final Answer:' line."
                    .to_string()
            }
        }
    }
}
