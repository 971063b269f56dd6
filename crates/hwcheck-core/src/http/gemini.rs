//! Gemini generateContent client
//!
//! Wraps the REST endpoint behind [`TextGenerator`]. The response parts are
//! flattened into one string here so the grading stages only ever deal with
//! text or a [`CompletionError`].

use crate::error::CompletionError;
use crate::traits::{ResponseFormat, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model name
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Gemini client configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; a missing key only fails when a call is attempted
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-2.0-flash`
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_API_URL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Extract the text of the first candidate from a raw response body
///
/// Text parts are concatenated in order; non-text parts are skipped.
pub fn extract_text(body: &str) -> Result<String, CompletionError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        CompletionError::MalformedResponse(format!("{}. Full response: {}", e, body))
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(CompletionError::EmptyResponse);
    }
    Ok(text)
}

/// Gemini text-completion client
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: GeminiConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hwcheck/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate_inner(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(CompletionError::MissingApiKey)?;

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: match format {
                ResponseFormat::Json => Some(GenerationConfig {
                    response_mime_type: "application/json",
                }),
                ResponseFormat::Text => None,
            },
        };

        tracing::debug!(model = %self.config.model, prompt_len = prompt.len(), "calling model");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_text(&text)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(
        &self,
        prompt: &str,
        format: ResponseFormat,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send {
        self.generate_inner(prompt, format)
    }
}
