//! Test-case synthesis from homework instructions

use crate::error::{Error, Result};
use crate::traits::{ResponseFormat, TextGenerator};
use crate::types::{TestCase, TestCaseSet};
use std::path::Path;

/// Prompt for generating test cases; `{instructions}` is the homework text
pub const TEST_GEN_PROMPT: &str = r#"You are an expert Test Case Generator AI. Based on the provided homework instructions, create 5 diverse and effective test cases that exercise normal input, edge cases and boundary values.
Your response MUST be a single, valid JSON object of the form:
{"test_cases": [{"description": "...", "input": "...", "expected_output": "..."}]}
"input" is written verbatim to the program's standard input and "expected_output" is compared with its standard output.
---
Homework Instructions:
{instructions}
---
"#;

/// Render the test-generation prompt
pub fn test_gen_prompt(instructions: &str) -> String {
    TEST_GEN_PROMPT.replace("{instructions}", instructions)
}

/// Strip Markdown code-fence artifacts around a JSON reply
///
/// Handles a leading fence line with an optional info string (```` ```json ````),
/// a trailing fence, and prose before the first `{` or after the last `}`.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let first_line = rest.find('\n').map_or(rest, |nl| &rest[..nl]);
        text = if first_line.contains('{') {
            rest.trim_start_matches(|c: char| c.is_ascii_alphabetic())
        } else {
            rest.find('\n').map_or("", |nl| &rest[nl + 1..])
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text = text.trim();

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            text = &text[start..=end];
        }
    }
    text
}

/// Decode the model's reply into test cases
///
/// Decode failure and an empty list are both errors: zero cases would
/// otherwise be reported as "all passed".
pub fn parse_test_cases(raw: &str) -> Result<Vec<TestCase>> {
    let json = strip_code_fences(raw);
    let set: TestCaseSet = serde_json::from_str(json).map_err(|e| {
        tracing::error!(raw = %raw, "failed to decode generated test cases");
        Error::TestGeneration(format!("failed to decode test cases: {}. Raw response: {}", e, raw))
    })?;

    if set.test_cases.is_empty() {
        return Err(Error::TestGeneration(
            "AI returned no test cases".into(),
        ));
    }
    Ok(set.test_cases)
}

/// Read the homework instructions file
pub async fn load_instructions(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::Instructions(format!(
            "Error reading homework instructions file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Ask the model for test cases, one call
pub async fn generate_test_cases<G: TextGenerator>(
    model: &G,
    instructions: &str,
) -> Result<Vec<TestCase>> {
    let raw = model
        .generate(&test_gen_prompt(instructions), ResponseFormat::Json)
        .await?;
    let cases = parse_test_cases(&raw)?;
    tracing::info!(count = cases.len(), "generated test cases");
    Ok(cases)
}
