//! Text transformation and analysis tools.

use reagent_core::{ExecutionResult, Tool};

/// Converts the input to uppercase.
pub struct TextUppercaseTool;

impl Tool for TextUppercaseTool {
    fn name(&self) -> &str {
        "text_uppercase"
    }

    fn description(&self) -> &str {
        "Converts the input text to uppercase"
    }

    fn call(&self, input: String) -> ExecutionResult {
        ExecutionResult::success(input.to_uppercase())
    }
}

/// Reverses the input character by character.
pub struct TextReverseTool;

impl Tool for TextReverseTool {
    fn name(&self) -> &str {
        "text_reverse"
    }

    fn description(&self) -> &str {
        "Reverses the input text"
    }

    fn call(&self, input: String) -> ExecutionResult {
        ExecutionResult::success(input.chars().rev().collect::<String>())
    }
}

/// Counts characters, words, and lines in the input.
pub struct TextCountTool;

impl Tool for TextCountTool {
    fn name(&self) -> &str {
        "text_count"
    }

    fn description(&self) -> &str {
        "Counts characters, words, and lines in the input text"
    }

    fn call(&self, input: String) -> ExecutionResult {
        let chars = input.chars().count();
        let words = input.split_whitespace().count();
        let lines = if input.is_empty() {
            0
        } else {
            input.lines().count()
        };
        ExecutionResult::success(format!("{chars} chars, {words} words, {lines} lines"))
    }
}
