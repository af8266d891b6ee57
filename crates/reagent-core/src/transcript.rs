//! Transcript data model.
//!
//! A [`Transcript`] is the ordered history of a single run: the user's goal,
//! the model's thoughts, requested actions, tool observations, and the final
//! answer. It is append-only for the duration of a run and owned exclusively
//! by that run; nothing retains it across runs.

use crate::identifiers::ToolName;
use serde::{Deserialize, Serialize};

/// One entry in a run's history. Exactly one variant is active per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "turn", rename_all = "snake_case")]
pub enum Turn {
    /// The natural-language goal that started the run.
    UserInput { text: String },

    /// Free-form reasoning text emitted by the model before an action or
    /// final answer.
    ModelThought { text: String },

    /// The model's request to invoke a tool.
    ActionRequest { tool: ToolName, input: String },

    /// The result fed back to the model after a tool call.
    ///
    /// `tool` is `None` for corrective observations the loop injects when
    /// the model's output could not be parsed into an action.
    Observation {
        tool: Option<ToolName>,
        content: String,
        is_error: bool,
    },

    /// The model's terminal answer.
    FinalAnswer { text: String },
}

impl Turn {
    /// Observation for a successful or failed tool execution.
    pub fn observation(tool: ToolName, content: impl Into<String>, is_error: bool) -> Self {
        Turn::Observation {
            tool: Some(tool),
            content: content.into(),
            is_error,
        }
    }

    /// Corrective observation with no originating tool.
    pub fn corrective(content: impl Into<String>) -> Self {
        Turn::Observation {
            tool: None,
            content: content.into(),
            is_error: true,
        }
    }
}

/// Ordered, append-only sequence of [`Turn`]s for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Iterate over turns in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the transcript has no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn, if any.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// The goal text, if the transcript starts with [`Turn::UserInput`].
    pub fn goal(&self) -> Option<&str> {
        match self.turns.first() {
            Some(Turn::UserInput { text }) => Some(text),
            _ => None,
        }
    }

    /// The tool of an [`Turn::ActionRequest`] that has no matching
    /// [`Turn::Observation`] yet.
    ///
    /// A non-`None` result means the transcript is mid-dispatch; assembling
    /// a prompt in that state is an invariant violation.
    pub fn open_action(&self) -> Option<&ToolName> {
        let mut pending = None;
        for turn in &self.turns {
            match turn {
                Turn::ActionRequest { tool, .. } => pending = Some(tool),
                Turn::Observation { .. } => pending = None,
                _ => {}
            }
        }
        pending
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ToolName {
        ToolName::parse(s).unwrap()
    }

    #[test]
    fn goal_is_first_user_input() {
        let mut t = Transcript::new();
        assert_eq!(t.goal(), None);

        t.push(Turn::UserInput {
            text: "count the vowels".to_string(),
        });
        assert_eq!(t.goal(), Some("count the vowels"));
    }

    #[test]
    fn open_action_tracks_unmatched_requests() {
        let mut t = Transcript::new();
        t.push(Turn::UserInput {
            text: "goal".to_string(),
        });
        assert_eq!(t.open_action(), None);

        t.push(Turn::ActionRequest {
            tool: name("echo"),
            input: "hi".to_string(),
        });
        assert_eq!(t.open_action().map(ToolName::as_str), Some("echo"));

        t.push(Turn::observation(name("echo"), "hi", false));
        assert_eq!(t.open_action(), None);
    }

    #[test]
    fn corrective_observation_has_no_tool() {
        let turn = Turn::corrective("respond using the required format");
        match turn {
            Turn::Observation {
                tool,
                is_error,
                ref content,
            } => {
                assert!(tool.is_none());
                assert!(is_error);
                assert!(content.contains("required format"));
            }
            _ => panic!("expected observation"),
        }
    }

    #[test]
    fn transcript_serializes_as_turn_list() {
        let mut t = Transcript::new();
        t.push(Turn::UserInput {
            text: "goal".to_string(),
        });
        t.push(Turn::FinalAnswer {
            text: "done".to_string(),
        });

        let json = serde_json::to_string(&t).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"turn\":\"final_answer\""));

        let back: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
