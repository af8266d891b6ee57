//! Testing utilities for the reagent loop.
//!
//! Provides deterministic stand-ins for the two external surfaces of the
//! runtime, plus a scenario harness:
//!
//! - [`ScriptedModelClient`] and [`FlakyModelClient`] replace the language
//!   model with canned or fault-injecting completions.
//! - [`MockTool`] and [`MockToolRegistry`] replace real tools with
//!   predictable responses and call tracking.
//! - [`RunHarness`] executes named scenarios end to end and checks
//!   expectations against the resulting report.

pub mod harness;
pub mod mock_model;
pub mod mock_tools;

pub use harness::{RunHarness, RunScenario, ScenarioResult};
pub use mock_model::{FlakyModelClient, ScriptedModelClient};
pub use mock_tools::{MockTool, MockToolRegistry};
