//! GitHub Actions workflow-command formatting

/// Escape a workflow-command message
///
/// `%` must be escaped first so the other escapes are not double-encoded.
pub fn escape_workflow_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// `::error::` annotation line
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_workflow_data(message))
}

/// `::warning::` annotation line
pub fn warning_annotation(message: &str) -> String {
    format!("::warning::{}", escape_workflow_data(message))
}
