//! The model client boundary.
//!
//! The runtime treats text generation as an opaque capability behind the
//! [`ModelClient`] trait: a request goes in, a completion comes out. No
//! provider wire format is defined here; concrete clients (HTTP providers,
//! local inference, scripted replays for tests) live behind this seam and
//! are injected into the loop by the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A fully-rendered, model-facing request.
///
/// The three sections are kept separate so clients that speak a structured
/// chat protocol can map them onto system/user roles, while single-prompt
/// clients can use [`CompletionRequest::rendered`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Fixed instructions, including the response grammar the model must
    /// follow.
    pub system_instructions: String,

    /// Serialized list of available tools (names, descriptions, schemas).
    pub tool_catalog: String,

    /// The transcript so far, rendered in the response grammar.
    pub transcript_text: String,
}

impl CompletionRequest {
    /// Render the request as a single prompt string.
    ///
    /// The concatenation is deterministic: identical requests render to
    /// byte-identical prompts.
    pub fn rendered(&self) -> String {
        format!(
            "{}\n\n{}\n\nBegin!\n\n{}",
            self.system_instructions, self.tool_catalog, self.transcript_text
        )
    }
}

/// A completion returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// The raw completion text, untouched by the runtime.
    pub text: String,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One increment of a streamed completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChunk {
    /// Text appended by this chunk.
    pub delta: String,
}

/// Transport-level failures from a model client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The endpoint could not be reached or returned a server error.
    #[error("model endpoint unavailable: {reason}")]
    Unavailable { reason: String },

    /// The provider signalled a rate limit.
    #[error("model quota exceeded")]
    QuotaExceeded {
        /// Provider-suggested wait before the next attempt.
        retry_after: Option<Duration>,
    },

    /// Credentials were rejected. Never retried: the outcome will not
    /// change without operator intervention.
    #[error("model credentials rejected")]
    InvalidCredentials,

    /// The call exceeded its deadline.
    #[error("model call timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },
}

impl ModelError {
    /// Whether a retry with backoff has any chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Unavailable { .. }
            | ModelError::QuotaExceeded { .. }
            | ModelError::Timeout { .. } => true,
            ModelError::InvalidCredentials => false,
        }
    }
}

/// Boxed chunk iterator returned by [`ModelClient::stream`].
pub type ChunkStream = Box<dyn Iterator<Item = Result<CompletionChunk, ModelError>> + Send>;

/// Abstract boundary to an external text-generation capability.
///
/// `complete` is a blocking call; the loop invokes it once per round.
/// Implementations must be thread-safe so one client can serve concurrent
/// runs.
pub trait ModelClient: Send + Sync {
    /// Issue a request and block until the full completion is available.
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, ModelError>;

    /// Incremental delivery of a completion.
    ///
    /// The default implementation performs a blocking [`complete`] and
    /// yields the whole text as a single chunk, so clients only override
    /// this when their transport actually streams.
    ///
    /// [`complete`]: ModelClient::complete
    fn stream(&self, request: &CompletionRequest) -> Result<ChunkStream, ModelError> {
        let completion = self.complete(request)?;
        Ok(Box::new(std::iter::once(Ok(CompletionChunk {
            delta: completion.text,
        }))))
    }
}
