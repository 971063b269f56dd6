//! Scripted text generator for tests

use crate::error::CompletionError;
use crate::traits::{ResponseFormat, TextGenerator};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Replays queued replies in order and records every prompt it receives
///
/// Once the queue is empty every further call returns
/// [`CompletionError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<(String, ResponseFormat)>>,
}

impl ScriptedGenerator {
    /// Create an empty generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that answers with the given texts in order
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scripted = Self::new();
        for reply in replies {
            scripted.push_reply(reply);
        }
        scripted
    }

    /// Queue a successful reply
    pub fn push_reply(&self, text: impl Into<String>) {
        self.replies.lock().push_back(Ok(text.into()));
    }

    /// Queue a failure
    pub fn push_error(&self, err: CompletionError) {
        self.replies.lock().push_back(Err(err));
    }

    /// Number of calls made so far
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Copy of every prompt received, in order
    pub fn prompts(&self) -> Vec<(String, ResponseFormat)> {
        self.prompts.lock().clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send {
        self.prompts.lock().push((prompt.to_string(), format));
        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or(Err(CompletionError::EmptyResponse));
        std::future::ready(reply)
    }
}
