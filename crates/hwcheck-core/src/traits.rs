//! Trait definitions for the external text-completion service

use crate::error::CompletionError;
use std::future::Future;

/// Shape the caller expects the completion text to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free text
    Text,
    /// A single JSON object
    Json,
}

/// Opaque text-completion endpoint
///
/// Returns the extracted text or a structured [`CompletionError`]; callers
/// never see the provider's response parts. Static dispatch only, no boxing.
pub trait TextGenerator {
    /// Send one prompt, get the concatenated response text
    fn generate(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> impl Future<Output = std::result::Result<String, CompletionError>> + Send;
}
