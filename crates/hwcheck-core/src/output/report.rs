//! Rendering of test reports and review outcomes

use crate::types::{CaseOutcome, ReviewOutcome, TestReport};
use std::fmt::Write;

/// Human-readable test report, one block per case
pub fn render_text(report: &TestReport) -> String {
    let mut out = String::with_capacity(256 + report.total() * 128);
    let _ = writeln!(out, "Functional Test Results");
    let _ = writeln!(out, "=======================");
    let _ = writeln!(out, "Language: {}", report.language);
    let _ = writeln!(out, "Entry point: {}", report.entry_point);

    for outcome in &report.outcomes {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "--- Test Case {}: {} ---",
            outcome.index, outcome.case.description
        );
        let _ = writeln!(out, "Input: '{}'", outcome.case.input);
        let _ = writeln!(out, "Expected Output: '{}'", outcome.case.expected_output.trim());
        let _ = writeln!(out, "Actual Output:   '{}'", outcome.actual_output);
        match &outcome.failure {
            None => {
                let _ = writeln!(out, "Result: PASSED");
            }
            Some(failure) => {
                let _ = writeln!(out, "Result: FAILED ({})", failure);
                if !outcome.stderr.trim().is_empty() {
                    let _ = writeln!(out, "Stderr: {}", outcome.stderr.trim_end());
                }
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "--- Functional Test Summary ---");
    out
}

/// Markdown table for the job summary page
pub fn render_markdown(report: &TestReport) -> String {
    let mut out = String::with_capacity(256 + report.total() * 96);
    let _ = writeln!(out, "## Functional test results");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "**Language:** {} | **Entry point:** `{}`",
        report.language, report.entry_point
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "| # | Description | Result | Details |");
    let _ = writeln!(out, "|---|---|---|---|");
    for outcome in &report.outcomes {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            outcome.index,
            table_cell(&outcome.case.description),
            if outcome.passed() { "pass" } else { "FAIL" },
            table_cell(&details(outcome)),
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.summary_line());
    out
}

fn details(outcome: &CaseOutcome) -> String {
    match &outcome.failure {
        None => String::new(),
        Some(failure) => format!(
            "{}; expected `{}`, got `{}`",
            failure,
            outcome.case.expected_output.trim(),
            outcome.actual_output
        ),
    }
}

/// Keep a value on one table row
fn table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

/// Machine-readable test report
pub fn test_report_json(report: &TestReport) -> serde_json::Value {
    let cases: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|o| {
            serde_json::json!({
                "index": o.index,
                "description": o.case.description,
                "input": o.case.input,
                "expected_output": o.case.expected_output,
                "actual_output": o.actual_output,
                "stderr": o.stderr,
                "exit_code": o.exit_code,
                "duration_ms": o.duration.as_millis() as u64,
                "passed": o.passed(),
                "failure": o.failure.as_ref().map(|f| f.to_string()),
            })
        })
        .collect();

    serde_json::json!({
        "status": "tested",
        "language": report.language,
        "entry_point": report.entry_point,
        "passed": report.passed(),
        "total": report.total(),
        "success": report.all_passed(),
        "cases": cases,
    })
}

/// JSON for the "nothing relevant changed" exit
pub fn nothing_to_test_json() -> serde_json::Value {
    serde_json::json!({ "status": "nothing_to_test", "success": true })
}

/// Machine-readable review outcome
pub fn review_json(outcome: &ReviewOutcome) -> serde_json::Value {
    match outcome {
        ReviewOutcome::Skipped(reason) => serde_json::json!({
            "status": "skipped",
            "reason": reason,
        }),
        ReviewOutcome::Reviewed { feedback, verdict } => serde_json::json!({
            "status": "reviewed",
            "verdict": verdict.as_str(),
            "feedback": feedback,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CaseFailure, ReviewVerdict, TestCase};
    use std::time::Duration;

    fn report() -> TestReport {
        let case = |d: &str, i: &str, e: &str| TestCase {
            description: d.into(),
            input: i.into(),
            expected_output: e.into(),
        };
        TestReport {
            language: "Python",
            entry_point: "main.py".into(),
            outcomes: vec![
                CaseOutcome {
                    index: 1,
                    case: case("positives", "3 4", "7"),
                    actual_output: "7".into(),
                    stderr: String::new(),
                    exit_code: Some(0),
                    duration: Duration::from_millis(12),
                    failure: None,
                },
                CaseOutcome {
                    index: 2,
                    case: case("a | b", "-1 1", "0\n"),
                    actual_output: "5".into(),
                    stderr: "warn\n".into(),
                    exit_code: Some(0),
                    duration: Duration::from_millis(3),
                    failure: Some(CaseFailure::Mismatch),
                },
            ],
        }
    }

    #[test]
    fn test_text_report() {
        let text = render_text(&report());
        assert!(text.contains("--- Test Case 1: positives ---"));
        assert!(text.contains("Result: PASSED"));
        assert!(text.contains("Expected Output: '0'"));
        assert!(text.contains("Result: FAILED (output mismatch)"));
        assert!(text.contains("Stderr: warn"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let md = render_markdown(&report());
        assert!(md.contains("| 2 | a \\| b | FAIL |"));
        assert!(md.contains("expected `0`, got `5`"));
        assert!(md.ends_with("Passed 1 out of 2 test cases for the Python project.\n"));
    }

    #[test]
    fn test_report_json_shape() {
        let json = test_report_json(&report());
        assert_eq!(json["passed"], 1);
        assert_eq!(json["total"], 2);
        assert_eq!(json["success"], false);
        assert_eq!(json["cases"][1]["failure"], "output mismatch");
        assert!(json["cases"][0]["failure"].is_null());
    }

    #[test]
    fn test_review_json() {
        let json = review_json(&ReviewOutcome::Reviewed {
            feedback: "REJECTED".into(),
            verdict: ReviewVerdict::Rejected,
        });
        assert_eq!(json["verdict"], "rejected");
        assert_eq!(review_json(&ReviewOutcome::Skipped("x"))["status"], "skipped");
    }
}
