//! Core type definitions

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;

/// Push event extracted from the webhook payload.
///
/// Parsed once; read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// SHA of the head commit
    pub head_sha: String,
    /// Repository owner login
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Per-commit file lists as reported by the webhook
    pub commits: Vec<PushCommit>,
}

/// File lists of one commit in a push payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PushCommit {
    /// Added paths
    #[serde(default)]
    pub added: Vec<String>,
    /// Modified paths
    #[serde(default)]
    pub modified: Vec<String>,
    /// Removed paths
    #[serde(default)]
    pub removed: Vec<String>,
}

impl PushEvent {
    /// Added and modified paths across all commits, first occurrence order, no duplicates
    pub fn changed_paths(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.commits
            .iter()
            .flat_map(|c| c.added.iter().chain(c.modified.iter()))
            .map(String::as_str)
            .filter(|p| seen.insert(*p))
            .collect()
    }
}

/// Change status of a file in a commit (GitHub API vocabulary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FileStatus {
    /// Added file
    Added,
    /// Modified file
    Modified,
    /// Removed file
    Removed,
    /// Renamed file
    Renamed,
    /// Any other status (copied, changed, unchanged)
    Other,
}

impl FileStatus {
    /// Parse from the GitHub API status string
    #[inline]
    pub fn parse(s: &str) -> Self {
        match s {
            "added" => Self::Added,
            "modified" => Self::Modified,
            "removed" => Self::Removed,
            "renamed" => Self::Renamed,
            _ => Self::Other,
        }
    }

    /// Only added and modified files are graded
    #[inline]
    pub const fn is_gradable(&self) -> bool {
        matches!(self, Self::Added | Self::Modified)
    }
}

/// A single file entry from the commit-detail API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFile {
    /// Repository-relative path
    pub filename: String,
    /// Change status
    pub status: FileStatus,
}

impl CommitFile {
    /// Create a new commit file entry
    pub fn new(filename: impl Into<String>, status: FileStatus) -> Self {
        Self {
            filename: filename.into(),
            status,
        }
    }
}

/// One AI-authored test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Short human description
    #[serde(default)]
    pub description: String,
    /// Text written to the program's stdin
    #[serde(default)]
    pub input: String,
    /// Expected stdout
    pub expected_output: String,
}

/// Wire shape of the generated test-case reply
#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseSet {
    /// Ordered test cases
    pub test_cases: Vec<TestCase>,
}

/// Why a test case failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseFailure {
    /// Program ran cleanly but printed something else
    Mismatch,
    /// Program exited with a non-zero status (None = killed by signal)
    ExitStatus(Option<i32>),
    /// Program could not be started or its pipes failed
    Spawn(String),
    /// Program exceeded the per-case wait and was killed
    Timeout(Duration),
}

impl std::fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseFailure::Mismatch => write!(f, "output mismatch"),
            CaseFailure::ExitStatus(Some(code)) => write!(f, "exited with status {}", code),
            CaseFailure::ExitStatus(None) => write!(f, "terminated by signal"),
            CaseFailure::Spawn(msg) => write!(f, "failed to run: {}", msg),
            CaseFailure::Timeout(d) => write!(f, "timed out after {}s", d.as_secs_f32()),
        }
    }
}

/// Result of running one test case
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    /// 1-based position in the generated list
    pub index: usize,
    /// The case that was run
    pub case: TestCase,
    /// Trimmed stdout of the program
    pub actual_output: String,
    /// Captured stderr (untrimmed)
    pub stderr: String,
    /// Exit code if the process exited normally
    pub exit_code: Option<i32>,
    /// Wall-clock duration of the run
    pub duration: Duration,
    /// `None` when the case passed
    pub failure: Option<CaseFailure>,
}

impl CaseOutcome {
    /// Whether this case passed
    #[inline]
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Aggregated result of a functional test run
#[derive(Debug, Clone)]
pub struct TestReport {
    /// Display name of the detected language
    pub language: &'static str,
    /// Basename of the selected entry point
    pub entry_point: String,
    /// Per-case outcomes in execution order
    pub outcomes: Vec<CaseOutcome>,
}

impl TestReport {
    /// Number of passing cases
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Total number of cases run
    #[inline]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// True when every case passed
    #[inline]
    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    /// One-line summary used for the log and the CI annotation
    pub fn summary_line(&self) -> String {
        format!(
            "Passed {} out of {} test cases for the {} project.",
            self.passed(),
            self.total(),
            self.language
        )
    }
}

/// Result of the functional test flow
#[derive(Debug)]
pub enum TestRunOutcome {
    /// No relevant source file changed; exit cleanly
    NothingToTest,
    /// Tests were generated and executed
    Tested(TestReport),
}

/// Verdict of the qualitative review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVerdict {
    /// Feedback did not mention a rejection
    Approved,
    /// Feedback contains "REJECTED" in any letter case
    Rejected,
}

impl ReviewVerdict {
    /// Classify feedback text; any case-insensitive "REJECTED" wins
    pub fn from_feedback(feedback: &str) -> Self {
        if feedback.to_uppercase().contains("REJECTED") {
            Self::Rejected
        } else {
            Self::Approved
        }
    }

    /// Get string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Result of the qualitative review flow
#[derive(Debug)]
pub enum ReviewOutcome {
    /// Nothing reviewable; the reason is printed and the process exits 0
    Skipped(&'static str),
    /// The model reviewed the submission
    Reviewed {
        /// Full model feedback
        feedback: String,
        /// Verdict derived from the feedback
        verdict: ReviewVerdict,
    },
}

/// Runtime configuration, borrowed from CLI arguments where possible
#[derive(Debug, Clone)]
pub struct InputConfig<'a> {
    // Repository layout
    pub repo_root: Cow<'a, str>,
    pub instructions_file: Cow<'a, str>,
    pub build_dir: Cow<'a, str>,

    // Review filtering
    pub grader_dir: Cow<'a, str>,
    pub workflows_dir: Cow<'a, str>,

    // Execution
    pub case_timeout_secs: u64,
}

impl<'a> Default for InputConfig<'a> {
    fn default() -> Self {
        Self {
            repo_root: Cow::Borrowed(".."),
            instructions_file: Cow::Borrowed("homework0e3.txt"),
            build_dir: Cow::Borrowed("."),
            grader_dir: Cow::Borrowed("correctness-tester/"),
            workflows_dir: Cow::Borrowed(".github/workflows/"),
            case_timeout_secs: 10,
        }
    }
}

impl<'a> InputConfig<'a> {
    /// Per-case wait, `None` when disabled
    #[inline]
    pub fn case_timeout(&self) -> Option<Duration> {
        (self.case_timeout_secs > 0).then(|| Duration::from_secs(self.case_timeout_secs))
    }
}
