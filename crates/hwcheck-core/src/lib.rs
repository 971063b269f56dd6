//! # hwcheck core
//!
//! Homework grading pipeline for GitHub Actions pushes.
//!
//! A run reads the push webhook, asks the GitHub API which files the head
//! commit touched, and then either:
//! - **tests**: detects the single language of the push, picks the entry
//!   point, has a language model write test cases from the homework
//!   instructions, compiles if needed and runs every case with a trimmed
//!   stdout comparison, or
//! - **reviews**: sends the pushed sources and the instructions to the model
//!   for an APPROVED/REJECTED verdict.
//!
//! The model sits behind the [`TextGenerator`] trait, so the whole pipeline
//! runs against [`http::ScriptedGenerator`] in tests.
//!
//! ## Example
//!
//! ```no_run
//! use hwcheck_core::http::{GeminiClient, GeminiConfig, GitHubApiClient};
//! use hwcheck_core::{GradingProcessor, InputConfig, LanguageTable, TestRunOutcome};
//! use std::path::Path;
//!
//! # async fn example() -> hwcheck_core::Result<()> {
//! let config = InputConfig::default();
//! let table = LanguageTable::builtin()?;
//! let github = GitHubApiClient::new("https://api.github.com", "token")?;
//! let model = GeminiClient::new(GeminiConfig::default())?;
//! let event = hwcheck_core::event::load_push_event(Path::new("event.json")).await?;
//!
//! let processor = GradingProcessor::new(&table, &github, &model, &config);
//! if let TestRunOutcome::Tested(report) = processor.run_tests(&event).await? {
//!     println!("{}", report.summary_line());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod coordination;
pub mod error;
pub mod event;
pub mod http;
pub mod language;
pub mod output;
pub mod platform;
pub mod runner;
pub mod traits;
pub mod types;

pub use coordination::GradingProcessor;
pub use error::{CompletionError, Error, ErrorKind, Result};
pub use language::{LanguageProfile, LanguageTable};
pub use traits::{ResponseFormat, TextGenerator};
pub use types::{
    CaseFailure, CaseOutcome, CommitFile, FileStatus, InputConfig, PushEvent, ReviewOutcome,
    ReviewVerdict, TestCase, TestReport, TestRunOutcome,
};
