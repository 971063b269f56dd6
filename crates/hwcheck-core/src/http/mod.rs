//! HTTP clients for the GitHub and model APIs

pub mod client;
pub mod gemini;
pub mod mock;

pub use client::GitHubApiClient;
pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::ScriptedGenerator;
