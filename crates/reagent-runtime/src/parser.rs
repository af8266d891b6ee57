//! Action parsing.
//!
//! Extracts an intended action or a final answer from raw model output.
//! Model output is untrusted: the parser is total (any string produces a
//! [`ParsedOutcome`], never a panic or error) and malformed output is a
//! recoverable condition the loop reports back to the model, not a fault.
//!
//! Recognized grammar, mirroring the ReAct convention the model is
//! instructed to follow:
//!
//! ```text
//! Thought: <free-form reasoning>
//! Action: <tool name>
//! Action Input: <input text>
//! ```
//!
//! or, terminally:
//!
//! ```text
//! Thought: I now know the final answer
//! Final Answer: <answer>
//! ```
//!
//! `Final Answer:` takes precedence when both tags are present: the
//! terminal signal wins ties.

use reagent_core::{Completion, ToolCall, ToolName};
use reagent_tools::ToolRegistry;

const FINAL_TAG: &str = "Final Answer:";
const ACTION_TAG: &str = "Action:";
const INPUT_TAG: &str = "Action Input:";
const THOUGHT_TAG: &str = "Thought:";

/// Why a completion failed to parse into an action or final answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The completion was empty or whitespace-only.
    Empty,
    /// No `Action:` or `Final Answer:` tag was found.
    MissingAction,
    /// The `Action:` tag named something that is not a valid tool name.
    InvalidToolName { name: String },
    /// The `Action:` tag named a tool absent from the registry.
    UnknownTool { name: String },
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::Empty => write!(f, "completion was empty"),
            MalformedReason::MissingAction => {
                write!(f, "no 'Action:' or 'Final Answer:' tag found")
            }
            MalformedReason::InvalidToolName { name } => {
                write!(f, "'{name}' is not a valid tool name")
            }
            MalformedReason::UnknownTool { name } => {
                write!(f, "tool '{name}' is not available")
            }
        }
    }
}

/// Result of parsing one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedOutcome {
    /// The model requested a tool invocation.
    Action {
        /// Reasoning text preceding the action, if any.
        thought: Option<String>,
        call: ToolCall,
    },

    /// The model produced its terminal answer.
    Final {
        thought: Option<String>,
        text: String,
    },

    /// The completion could not be interpreted. Recoverable: the loop
    /// feeds a corrective observation back to the model.
    Malformed { raw: String, reason: MalformedReason },
}

/// Parser for the ReAct tagged-line grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionParser;

impl ActionParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a completion against the set of known tools.
    pub fn parse(&self, completion: &Completion, registry: &dyn ToolRegistry) -> ParsedOutcome {
        let raw = completion.text.as_str();
        if raw.trim().is_empty() {
            return ParsedOutcome::Malformed {
                raw: raw.to_string(),
                reason: MalformedReason::Empty,
            };
        }

        // Terminal signal wins ties: check Final Answer before Action.
        if let Some(idx) = raw.find(FINAL_TAG) {
            let text = raw[idx + FINAL_TAG.len()..].trim().to_string();
            let thought = extract_thought(&raw[..idx]);
            return ParsedOutcome::Final { thought, text };
        }

        let Some((action_start, name_text, inline_input)) = find_action(raw) else {
            return ParsedOutcome::Malformed {
                raw: raw.to_string(),
                reason: MalformedReason::MissingAction,
            };
        };

        let name_text = strip_decoration(&name_text);
        let input = match inline_input {
            Some(input) => input,
            None => collect_input(&raw[action_start..]),
        };

        let name = match ToolName::parse(&name_text) {
            Ok(name) => name,
            Err(_) => {
                return ParsedOutcome::Malformed {
                    raw: raw.to_string(),
                    reason: MalformedReason::InvalidToolName { name: name_text },
                };
            }
        };
        if !registry.contains(&name) {
            return ParsedOutcome::Malformed {
                raw: raw.to_string(),
                reason: MalformedReason::UnknownTool {
                    name: name.as_str().to_string(),
                },
            };
        }

        ParsedOutcome::Action {
            thought: extract_thought(&raw[..action_start]),
            call: ToolCall::from_validated(name, input),
        }
    }
}

/// Locate the last `Action:` line. Returns the byte offset of the line, the
/// text after the tag (minus any inline `Action Input:`), and the inline
/// input when both tags share a line.
fn find_action(raw: &str) -> Option<(usize, String, Option<String>)> {
    let mut found = None;
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with(ACTION_TAG) && !trimmed.starts_with(INPUT_TAG) {
            let tag_pos = offset + (line.len() - trimmed.len());
            let remainder = trimmed[ACTION_TAG.len()..].trim();
            if let Some(idx) = remainder.find(INPUT_TAG) {
                let name = remainder[..idx].trim().trim_end_matches(',').trim();
                let input = strip_decoration(remainder[idx + INPUT_TAG.len()..].trim());
                found = Some((tag_pos, name.to_string(), Some(input)));
            } else {
                found = Some((tag_pos, remainder.to_string(), None));
            }
        }
        offset += line.len();
    }
    found
}

/// Gather the `Action Input:` text following an action line: the remainder
/// of the tag line plus any untagged continuation lines.
fn collect_input(after_action: &str) -> String {
    let mut collecting = false;
    let mut parts: Vec<&str> = Vec::new();
    for line in after_action.lines() {
        let trimmed = line.trim_start();
        if collecting {
            if is_tagged(trimmed) {
                break;
            }
            parts.push(line);
        } else if trimmed.starts_with(INPUT_TAG) {
            parts.push(trimmed[INPUT_TAG.len()..].trim_start());
            collecting = true;
        }
    }
    let joined = parts.join("\n");
    strip_decoration(joined.trim())
}

fn is_tagged(line: &str) -> bool {
    [THOUGHT_TAG, ACTION_TAG, INPUT_TAG, FINAL_TAG, "Observation:", "Question:"]
        .iter()
        .any(|tag| line.starts_with(tag))
}

/// Reasoning text preceding an action or final answer, with the `Thought:`
/// tag stripped.
fn extract_thought(before: &str) -> Option<String> {
    let mut cleaned = before.trim();
    if let Some(idx) = cleaned.find(THOUGHT_TAG) {
        cleaned = cleaned[idx + THOUGHT_TAG.len()..].trim();
    }
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Strip markdown fences, wrapping brackets, and matching quotes that
/// models habitually add around names and inputs.
fn strip_decoration(text: &str) -> String {
    let mut s = text.trim();

    if s.starts_with("```") {
        if let Some(rest) = s.split_once('\n').map(|(_, rest)| rest) {
            s = rest.trim_end();
            s = s.strip_suffix("```").unwrap_or(s).trim_end();
        }
    }

    loop {
        let stripped = strip_pair(s, '"', '"')
            .or_else(|| strip_pair(s, '\'', '\''))
            .or_else(|| strip_pair(s, '`', '`'))
            .or_else(|| strip_pair(s, '[', ']'));
        match stripped {
            Some(inner) if inner != s => s = inner.trim(),
            _ => break,
        }
    }
    s.to_string()
}

fn strip_pair(s: &str, open: char, close: char) -> Option<&str> {
    if s.len() >= 2 && s.starts_with(open) && s.ends_with(close) {
        Some(&s[open.len_utf8()..s.len() - close.len_utf8()])
    } else {
        None
    }
}
