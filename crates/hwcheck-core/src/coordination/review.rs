//! Qualitative review of pushed homework code

use crate::error::Result;
use crate::platform::PathUtil;
use crate::traits::{ResponseFormat, TextGenerator};
use crate::types::{ReviewOutcome, ReviewVerdict};
use std::path::Path;

/// Review prompt; `{instructions}` and `{code}` are substituted
pub const REVIEW_PROMPT: &str = r#"You are an AI assistant specialized in evaluating code against homework instructions.
Analyze the provided code files (which may be in various programming languages) and determine whether they correctly implement the requirements described in the homework instructions.
Focus on correctness, completeness, and adherence to the problem statement. Do not focus on style unless the instructions mention it.

---
Homework Instructions:
{instructions}
---

---
Provided Code Files:
{code}
---

Provide a concise evaluation.
If the code is correct and complete according to the instructions, state "APPROVED" and give a brief justification.
If there are issues, state "REJECTED" and explain clearly what needs to be fixed.
Be specific and actionable, referencing parts of the code or instructions where useful.
"#;

/// Drop grader-internal paths from the review set
///
/// Skips everything under the grader and workflow directories and the
/// instructions file itself.
pub fn filter_review_paths<'a>(
    paths: &[&'a str],
    grader_dir: &str,
    workflows_dir: &str,
    instructions_file: &str,
) -> Vec<&'a str> {
    paths
        .iter()
        .copied()
        .filter(|path| {
            let posix = PathUtil::to_posix(path);
            let internal = (!grader_dir.is_empty() && posix.starts_with(grader_dir))
                || (!workflows_dir.is_empty() && posix.starts_with(workflows_dir))
                || posix == instructions_file;
            if internal {
                tracing::info!(path = %posix, "skipping internal/config file");
            }
            !internal
        })
        .collect()
}

/// Concatenate readable files under `--- File: <path> ---` headers
///
/// Unreadable files are logged and skipped. Returns an empty string when
/// nothing could be read.
pub async fn bundle_sources(repo_root: &Path, paths: &[&str]) -> String {
    let mut bundle = String::new();
    for path in paths {
        let full = PathUtil::in_repo(repo_root, path);
        match tokio::fs::read_to_string(&full).await {
            Ok(code) => {
                bundle.push_str("--- File: ");
                bundle.push_str(path);
                bundle.push_str(" ---\n");
                bundle.push_str(&code);
                bundle.push_str("\n\n");
            }
            Err(e) => {
                tracing::warn!(path = %full.display(), error = %e, "could not read file, skipping");
            }
        }
    }
    bundle
}

/// Render the review prompt
pub fn review_prompt(instructions: &str, code: &str) -> String {
    REVIEW_PROMPT
        .replace("{instructions}", instructions)
        .replace("{code}", code)
}

/// Ask the model for a verdict over the bundled sources
pub async fn review_sources<G: TextGenerator>(
    model: &G,
    instructions: &str,
    code: &str,
) -> Result<ReviewOutcome> {
    let feedback = model
        .generate(&review_prompt(instructions, code), ResponseFormat::Text)
        .await?;

    let verdict = ReviewVerdict::from_feedback(&feedback);
    tracing::info!(verdict = verdict.as_str(), "review complete");
    Ok(ReviewOutcome::Reviewed { feedback, verdict })
}
