//! Replay model client.
//!
//! Reads a script of completions from a plain-text file and serves them in
//! order, one per model call. Completions are separated by lines consisting
//! of exactly `---`. This lets a full agent run be exercised from the
//! command line without any model endpoint.
//!
//! ```text
//! Thought: I should try the calculator
//! Action: calc
//! Action Input: 6 * 7
//! ---
//! Final Answer: 42
//! ```

use reagent::{Completion, CompletionRequest, ModelClient, ModelError};
use reagent_testing::ScriptedModelClient;
use std::path::Path;

const SEPARATOR: &str = "---";

/// Serves completions from a script file.
pub struct ReplayModelClient {
    inner: ScriptedModelClient,
}

impl ReplayModelClient {
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_script(&text))
    }

    pub fn from_script(text: &str) -> Self {
        Self {
            inner: ScriptedModelClient::new(split_script(text)),
        }
    }

    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

impl ModelClient for ReplayModelClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, ModelError> {
        self.inner.complete(request)
    }
}

/// Split on `---` lines, trimming each completion and dropping empty ones.
fn split_script(text: &str) -> Vec<String> {
    let mut completions = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim() == SEPARATOR {
            push_completion(&mut completions, &mut current);
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    push_completion(&mut completions, &mut current);
    completions
}

fn push_completion(completions: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        completions.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_instructions: String::new(),
            tool_catalog: String::new(),
            transcript_text: String::new(),
        }
    }

    #[test]
    fn splits_on_separator_lines() {
        let client = ReplayModelClient::from_script(
            "Action: echo\nAction Input: hi\n---\nFinal Answer: hi\n",
        );
        assert_eq!(client.remaining(), 2);
        assert_eq!(
            client.complete(&request()).unwrap().text,
            "Action: echo\nAction Input: hi"
        );
        assert_eq!(client.complete(&request()).unwrap().text, "Final Answer: hi");
    }

    #[test]
    fn blank_sections_are_dropped() {
        let client = ReplayModelClient::from_script("---\n\n---\nFinal Answer: ok\n---\n");
        assert_eq!(client.remaining(), 1);
    }

    #[test]
    fn exhausted_script_reports_unavailable() {
        let client = ReplayModelClient::from_script("Final Answer: once");
        client.complete(&request()).unwrap();
        assert!(matches!(
            client.complete(&request()),
            Err(ModelError::Unavailable { .. })
        ));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");
        std::fs::write(&path, "Final Answer: from disk\n").unwrap();

        let client = ReplayModelClient::from_path(&path).unwrap();
        assert_eq!(
            client.complete(&request()).unwrap().text,
            "Final Answer: from disk"
        );
    }
}
