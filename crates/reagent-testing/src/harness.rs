//! Scenario harness for end-to-end runs.
//!
//! A [`RunScenario`] names a goal and the expectations to check against the
//! finished [`RunReport`]; a [`RunHarness`] executes scenarios against one
//! agent and accumulates results.

use reagent_core::{ModelClient, Turn};
use reagent_runtime::{AgentLoop, RunReport};
use reagent_tools::ToolRegistry;
use std::time::Duration;

/// A named end-to-end run with expectations.
#[derive(Debug, Clone)]
pub struct RunScenario {
    pub name: String,
    /// The user goal the run starts from.
    pub goal: String,
    /// Whether the run is expected to end in a final answer.
    pub expect_success: bool,
    /// Substring the final answer must contain, if any.
    pub expect_final_contains: Option<String>,
    /// Tool names that must appear as action requests, in order.
    pub expect_tool_calls: Vec<String>,
    /// Upper bound on rounds executed, if any.
    pub expect_rounds_at_most: Option<u32>,
}

impl RunScenario {
    pub fn named(name: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            goal: goal.into(),
            expect_success: true,
            expect_final_contains: None,
            expect_tool_calls: Vec::new(),
            expect_rounds_at_most: None,
        }
    }

    /// Require the final answer to contain `text`.
    pub fn expecting_final(mut self, text: impl Into<String>) -> Self {
        self.expect_final_contains = Some(text.into());
        self
    }

    /// Require an action request for `tool`, in the order given.
    pub fn expecting_tool(mut self, tool: impl Into<String>) -> Self {
        self.expect_tool_calls.push(tool.into());
        self
    }

    /// Cap the rounds the run may take.
    pub fn within_rounds(mut self, rounds: u32) -> Self {
        self.expect_rounds_at_most = Some(rounds);
        self
    }

    /// Expect the run to terminate without a final answer.
    pub fn expecting_no_answer(mut self) -> Self {
        self.expect_success = false;
        self
    }
}

/// Outcome of checking one scenario.
#[derive(Debug)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    /// Expectation violations, empty when passed.
    pub failures: Vec<String>,
    /// The report, absent when the run aborted with a fatal error.
    pub report: Option<RunReport>,
    pub elapsed: Duration,
}

impl ScenarioResult {
    pub fn summary(&self) -> String {
        let status = if self.passed { "PASS" } else { "FAIL" };
        let millis = self.elapsed.as_millis();
        if self.failures.is_empty() {
            format!("[{status}] {} ({millis}ms)", self.scenario_name)
        } else {
            format!(
                "[{status}] {} ({millis}ms): {}",
                self.scenario_name,
                self.failures.join("; ")
            )
        }
    }
}

/// Executes scenarios against a single agent and collects results.
pub struct RunHarness<M, R> {
    agent: AgentLoop<M, R>,
    results: Vec<ScenarioResult>,
}

impl<M, R> RunHarness<M, R>
where
    M: ModelClient,
    R: ToolRegistry,
{
    pub fn new(agent: AgentLoop<M, R>) -> Self {
        Self {
            agent,
            results: Vec::new(),
        }
    }

    /// Run one scenario and record its result.
    pub fn run(&mut self, scenario: RunScenario) -> &ScenarioResult {
        let started = std::time::Instant::now();
        let mut failures = Vec::new();

        let report = match self.agent.run(scenario.goal.clone()) {
            Ok(report) => Some(report),
            Err(err) => {
                failures.push(format!("run aborted: {err}"));
                None
            }
        };

        if let Some(report) = &report {
            check_report(&scenario, report, &mut failures);
        }

        self.results.push(ScenarioResult {
            scenario_name: scenario.name,
            passed: failures.is_empty(),
            failures,
            report,
            elapsed: started.elapsed(),
        });
        let last = self.results.len() - 1;
        &self.results[last]
    }

    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// One summary line per scenario.
    pub fn summary(&self) -> String {
        self.results
            .iter()
            .map(ScenarioResult::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn check_report(scenario: &RunScenario, report: &RunReport, failures: &mut Vec<String>) {
    if scenario.expect_success != report.outcome.is_success() {
        failures.push(format!(
            "expected success={}, got outcome {:?}",
            scenario.expect_success, report.outcome
        ));
    }

    if let Some(needle) = &scenario.expect_final_contains {
        match report.outcome.final_text() {
            Some(text) if text.contains(needle) => {}
            Some(text) => {
                failures.push(format!("final answer '{text}' does not contain '{needle}'"));
            }
            None => failures.push(format!("no final answer to match '{needle}'")),
        }
    }

    if !scenario.expect_tool_calls.is_empty() {
        let called: Vec<&str> = report
            .transcript
            .iter()
            .filter_map(|turn| match turn {
                Turn::ActionRequest { tool, .. } => Some(tool.as_str()),
                _ => None,
            })
            .collect();
        let mut remaining = called.iter();
        for expected in &scenario.expect_tool_calls {
            if !remaining.any(|name| name == expected) {
                failures.push(format!(
                    "expected tool call '{expected}' not found in order; calls were {called:?}"
                ));
                break;
            }
        }
    }

    if let Some(limit) = scenario.expect_rounds_at_most {
        if report.rounds > limit {
            failures.push(format!("took {} rounds, limit {limit}", report.rounds));
        }
    }
}
