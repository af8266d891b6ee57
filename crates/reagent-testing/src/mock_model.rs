//! Deterministic model clients for tests.

use reagent_core::{Completion, CompletionRequest, ModelClient, ModelError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A model client that replays a fixed script of completions.
///
/// Each call to [`ModelClient::complete`] pops the next entry. Once the
/// script is exhausted the client reports [`ModelError::Unavailable`], which
/// surfaces as a fatal run error and makes an under-provisioned script
/// visible immediately instead of looping silently.
pub struct ScriptedModelClient {
    script: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedModelClient {
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(script.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script with a single entry.
    pub fn single(completion: impl Into<String>) -> Self {
        Self::new([completion.into()])
    }

    /// How many completions have been served so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// The fully rendered prompts observed, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Entries remaining in the script.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl ModelClient for ScriptedModelClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, ModelError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.rendered());
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .map(Completion::new)
            .ok_or_else(|| ModelError::Unavailable {
                reason: "scripted client exhausted".to_string(),
            })
    }
}

/// A model client that fails a set number of times before delegating.
///
/// Used to exercise the runtime's retry policy: the first `failures` calls
/// return a retryable transport error, subsequent calls pass through to the
/// wrapped script.
pub struct FlakyModelClient {
    inner: ScriptedModelClient,
    failures: Mutex<u32>,
}

impl FlakyModelClient {
    pub fn new(failures: u32, inner: ScriptedModelClient) -> Self {
        Self {
            inner,
            failures: Mutex::new(failures),
        }
    }

    /// Total calls observed, including failed ones.
    pub fn calls(&self) -> usize {
        self.inner.calls()
    }
}

impl ModelClient for FlakyModelClient {
    fn complete(&self, request: &CompletionRequest) -> Result<Completion, ModelError> {
        if let Ok(mut remaining) = self.failures.lock() {
            if *remaining > 0 {
                *remaining -= 1;
                // Record the prompt without consuming a script entry.
                if let Ok(mut requests) = self.inner.requests.lock() {
                    requests.push(request.rendered());
                }
                return Err(ModelError::Unavailable {
                    reason: "injected transport failure".to_string(),
                });
            }
        }
        self.inner.complete(request)
    }
}
