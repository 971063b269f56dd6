//! Sequential test-case execution

use crate::error::{Error, Result};
use crate::types::{CaseFailure, CaseOutcome, TestCase};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Compare program output with the expected text
///
/// Only leading/trailing whitespace is ignored; inner whitespace and line
/// endings must match exactly.
#[inline]
pub fn outputs_match(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

/// Runs one resolved command per test case, feeding the case input on stdin
#[derive(Debug, Clone)]
pub struct TestExecutor {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl TestExecutor {
    /// Create an executor from a resolved command line
    pub fn new(command: Vec<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut iter = command.into_iter();
        let program = iter
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::Config("empty run command".into()))?;
        Ok(Self {
            program,
            args: iter.collect(),
            timeout,
        })
    }

    /// Full command line, for logs
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run every case in order; failures never abort the loop
    pub async fn run_all(&self, cases: &[TestCase]) -> Vec<CaseOutcome> {
        let mut outcomes = Vec::with_capacity(cases.len());
        for (i, case) in cases.iter().enumerate() {
            let outcome = self.run_case(i + 1, case).await;
            log_outcome(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Run a single case
    pub async fn run_case(&self, index: usize, case: &TestCase) -> CaseOutcome {
        let start = Instant::now();
        let mut outcome = CaseOutcome {
            index,
            case: case.clone(),
            actual_output: String::new(),
            stderr: String::new(),
            exit_code: None,
            duration: Duration::ZERO,
            failure: None,
        };

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                outcome.failure = Some(CaseFailure::Spawn(format!("{}: {}", self.program, e)));
                outcome.duration = start.elapsed();
                return outcome;
            }
        };

        // Feed stdin while the output is drained so a chatty program cannot
        // block on a full pipe.
        let stdin = child.stdin.take();
        let input = case.input.as_bytes();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(input).await {
                    Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };
        let run = async { tokio::join!(feed, child.wait_with_output()) };

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(joined) => joined,
                Err(_) => {
                    outcome.failure = Some(CaseFailure::Timeout(limit));
                    outcome.duration = start.elapsed();
                    return outcome;
                }
            },
            None => run.await,
        };
        outcome.duration = start.elapsed();

        let output = match joined {
            (_, Err(e)) | (Err(e), _) => {
                outcome.failure = Some(CaseFailure::Spawn(e.to_string()));
                return outcome;
            }
            (Ok(()), Ok(output)) => output,
        };

        outcome.actual_output = String::from_utf8_lossy(&output.stdout).trim().to_string();
        outcome.stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        outcome.exit_code = output.status.code();

        outcome.failure = if !output.status.success() {
            Some(CaseFailure::ExitStatus(output.status.code()))
        } else if !outputs_match(&outcome.actual_output, &case.expected_output) {
            Some(CaseFailure::Mismatch)
        } else {
            None
        };
        outcome
    }
}

fn log_outcome(outcome: &CaseOutcome) {
    match &outcome.failure {
        None => tracing::info!(
            case = outcome.index,
            description = %outcome.case.description,
            "PASSED"
        ),
        Some(failure) => {
            tracing::warn!(
                case = outcome.index,
                description = %outcome.case.description,
                input = %outcome.case.input,
                expected = %outcome.case.expected_output.trim(),
                actual = %outcome.actual_output,
                reason = %failure,
                "FAILED"
            );
            if !outcome.stderr.is_empty() {
                tracing::warn!(case = outcome.index, stderr = %outcome.stderr, "program stderr");
            }
        }
    }
}
