//! Grading pipeline coordinator

use crate::coordination::detector::{detect_language, Detection};
use crate::coordination::entry_point::resolve_entry_point;
use crate::coordination::review::{bundle_sources, filter_review_paths, review_sources};
use crate::coordination::test_gen::{generate_test_cases, load_instructions};
use crate::error::Result;
use crate::http::GitHubApiClient;
use crate::language::{LanguageTable, COMPILED_EXECUTABLE_NAME};
use crate::platform::PathUtil;
use crate::runner::{compile, TestExecutor};
use crate::traits::TextGenerator;
use crate::types::{
    CommitFile, InputConfig, PushEvent, ReviewOutcome, TestReport, TestRunOutcome,
};
use std::path::{Path, PathBuf};

/// Printed when the review set is empty after filtering
pub const NOTHING_TO_REVIEW: &str =
    "No relevant code files found for evaluation after filtering. Skipping evaluation.";

/// Printed when none of the review files could be read
pub const NOTHING_READABLE: &str =
    "No code could be read from the changed files. Skipping evaluation.";

/// Runs the test and review flows for one push
///
/// Every stage runs once, in order; the first error ends the flow.
pub struct GradingProcessor<'a, G> {
    table: &'a LanguageTable,
    github: &'a GitHubApiClient,
    model: &'a G,
    config: &'a InputConfig<'a>,
}

impl<'a, G: TextGenerator> GradingProcessor<'a, G> {
    /// Create a new processor
    pub fn new(
        table: &'a LanguageTable,
        github: &'a GitHubApiClient,
        model: &'a G,
        config: &'a InputConfig<'a>,
    ) -> Self {
        Self {
            table,
            github,
            model,
            config,
        }
    }

    fn repo_root(&self) -> &Path {
        Path::new(self.config.repo_root.as_ref())
    }

    fn instructions_path(&self) -> PathBuf {
        PathUtil::in_repo(self.repo_root(), &self.config.instructions_file)
    }

    async fn fetch_changed(&self, event: &PushEvent) -> Result<Vec<CommitFile>> {
        tracing::info!(
            owner = %event.owner,
            repo = %event.repo,
            sha = %event.head_sha,
            "fetching commit details"
        );
        let files = self
            .github
            .get_commit_files(&event.owner, &event.repo, &event.head_sha)
            .await?;
        tracing::debug!(
            api = files.len(),
            webhook = ?event.changed_paths(),
            "changed files reported"
        );
        Ok(files)
    }

    /// Generate test cases and run them against the pushed program
    pub async fn run_tests(&self, event: &PushEvent) -> Result<TestRunOutcome> {
        let changed = self.fetch_changed(event).await?;

        let (profile, files) = match detect_language(self.table, &changed)? {
            Detection::Nothing => {
                tracing::info!(
                    "No relevant code files ({}) changed in this push. Skipping functional tests.",
                    self.table.describe()
                );
                return Ok(TestRunOutcome::NothingToTest);
            }
            Detection::Detected { profile, files } => (profile, files),
        };
        tracing::info!(
            language = profile.name,
            compiled = profile.needs_compile(),
            files = ?files,
            "detected changed sources"
        );

        let project = resolve_entry_point(profile, &files, self.repo_root(), self.model).await?;

        let instructions = load_instructions(&self.instructions_path()).await?;
        let cases = generate_test_cases(self.model, &instructions).await?;

        let build_output = Path::new(self.config.build_dir.as_ref()).join(COMPILED_EXECUTABLE_NAME);
        compile(&project, &build_output).await?;

        let command = profile
            .run
            .resolve(&project.command_context(&build_output));
        let executor = TestExecutor::new(command, self.config.case_timeout())?;
        tracing::info!(command = %executor.command_line(), cases = cases.len(), "running test cases");

        let outcomes = executor.run_all(&cases).await;
        Ok(TestRunOutcome::Tested(TestReport {
            language: profile.name,
            entry_point: project.entry_basename,
            outcomes,
        }))
    }

    /// Ask the model for a qualitative verdict over the pushed files
    pub async fn run_review(&self, event: &PushEvent) -> Result<ReviewOutcome> {
        let changed = self.fetch_changed(event).await?;
        let paths: Vec<&str> = changed
            .iter()
            .filter(|f| f.status.is_gradable())
            .map(|f| f.filename.as_str())
            .collect();

        let kept = filter_review_paths(
            &paths,
            &self.config.grader_dir,
            &self.config.workflows_dir,
            &self.config.instructions_file,
        );
        if kept.is_empty() {
            return Ok(ReviewOutcome::Skipped(NOTHING_TO_REVIEW));
        }

        let instructions = load_instructions(&self.instructions_path()).await?;

        let code = bundle_sources(self.repo_root(), &kept).await;
        if code.is_empty() {
            return Ok(ReviewOutcome::Skipped(NOTHING_READABLE));
        }

        review_sources(self.model, &instructions, &code).await
    }
}
