#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use hwcheck_core::event::load_push_event;
use hwcheck_core::http::client::DEFAULT_GITHUB_API_URL;
use hwcheck_core::http::gemini::{DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL};
use hwcheck_core::http::{GeminiClient, GeminiConfig, GitHubApiClient};
use hwcheck_core::output::report as render;
use hwcheck_core::output::{error_annotation, warning_annotation, OutputWriter};
use hwcheck_core::{
    Error, GradingProcessor, InputConfig, LanguageTable, PushEvent, ReviewOutcome, ReviewVerdict,
    TestRunOutcome,
};
use std::borrow::Cow;
use std::future::Future;
use std::io::Write;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hwcheck",
    version,
    about = "AI-assisted homework grading for GitHub Actions pushes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Generate test cases and run them against the pushed program
    Test(TestArgs),
    /// Ask the model for an APPROVED/REJECTED review of the pushed files
    Review(ReviewArgs),
}

impl Commands {
    fn common(&self) -> &CommonArgs {
        match self {
            Commands::Test(args) => &args.common,
            Commands::Review(args) => &args.common,
        }
    }
}

#[derive(clap::Args)]
struct CommonArgs {
    /// Path of the push event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<String>,

    /// GitHub token for API access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Gemini API key (needed once a model call is made)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    github_api_url: String,

    /// Model name
    #[arg(long, env = "HWCHECK_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    model: String,

    /// Model API base URL
    #[arg(long, env = "HWCHECK_MODEL_API_URL", default_value = DEFAULT_GEMINI_API_URL)]
    model_api_url: String,

    /// Repository root, relative to the working directory
    #[arg(long, env = "HWCHECK_REPO_ROOT", default_value = "..")]
    repo_root: String,

    /// Homework instructions file, relative to the repository root
    #[arg(long, env = "HWCHECK_INSTRUCTIONS_FILE", default_value = "homework0e3.txt")]
    instructions_file: String,

    /// Output format (default: gha under GitHub Actions, text otherwise)
    #[arg(long, env = "HWCHECK_OUTPUT_FORMAT", value_enum)]
    output_format: Option<OutputFormat>,

    /// Log format: text or json
    #[arg(long, env = "HWCHECK_LOG_FORMAT", default_value = "text")]
    log_format: String,

    /// Job summary file
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    step_summary: Option<String>,

    /// Step outputs file
    #[arg(long, env = "GITHUB_OUTPUT")]
    github_output: Option<String>,
}

#[derive(clap::Args)]
struct TestArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Per-case timeout in seconds (0 = wait forever)
    #[arg(long, env = "HWCHECK_CASE_TIMEOUT", default_value_t = 10)]
    case_timeout: u64,

    /// Directory receiving compiled executables
    #[arg(long, env = "HWCHECK_BUILD_DIR", default_value = ".")]
    build_dir: String,
}

#[derive(clap::Args)]
struct ReviewArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Path prefix of grader files excluded from review
    #[arg(long, env = "HWCHECK_GRADER_DIR", default_value = "correctness-tester/")]
    grader_dir: String,

    /// Path prefix of workflow files excluded from review
    #[arg(long, env = "HWCHECK_WORKFLOWS_DIR", default_value = ".github/workflows/")]
    workflows_dir: String,
}

/// Output format for the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// GitHub Actions: text plus `::error::` annotations
    Gha,
    /// Full JSON to stdout, no annotations
    Json,
    /// Human-readable text to stdout
    Text,
}

impl OutputFormat {
    fn detect(explicit: Option<Self>) -> Self {
        explicit.unwrap_or_else(|| {
            if std::env::var("GITHUB_ACTIONS").is_ok() {
                OutputFormat::Gha
            } else {
                OutputFormat::Text
            }
        })
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.common().log_format == "json");

    let code = match &cli.command {
        Commands::Test(args) => run_test(args),
        Commands::Review(args) => run_review(args),
    };
    std::process::exit(code);
}

/// Logs go to stderr; stdout carries the report and annotations.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// Shared setup for both flows: runtime, event, clients, language table
fn block_on_pipeline<T, F, Fut>(common: &CommonArgs, flow: F) -> hwcheck_core::Result<T>
where
    F: FnOnce(PushEvent, GitHubApiClient, GeminiClient, LanguageTable) -> Fut,
    Fut: Future<Output = hwcheck_core::Result<T>>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(format!("failed to create runtime: {}", e)))?;

    rt.block_on(async {
        let event_path = clean_opt(&common.event_path)
            .ok_or_else(|| Error::Config("GITHUB_EVENT_PATH environment variable not set".into()))?;
        tracing::info!(path = event_path, "reading GitHub push event");
        let event = load_push_event(Path::new(event_path)).await?;

        let github = GitHubApiClient::new(
            common.github_api_url.as_str(),
            clean_opt(&common.token).unwrap_or_default(),
        )?;
        let model = GeminiClient::new(GeminiConfig {
            api_key: clean_opt(&common.gemini_api_key).map(str::to_string),
            model: common.model.clone(),
            base_url: common.model_api_url.clone(),
            ..GeminiConfig::default()
        })?;
        let table = LanguageTable::builtin()?;

        flow(event, github, model, table).await
    })
}

fn base_config<'a>(common: &'a CommonArgs) -> InputConfig<'a> {
    InputConfig {
        repo_root: Cow::Borrowed(&common.repo_root),
        instructions_file: Cow::Borrowed(&common.instructions_file),
        ..Default::default()
    }
}

fn run_test(args: &TestArgs) -> i32 {
    let common = &args.common;
    let format = OutputFormat::detect(common.output_format);
    let config = InputConfig {
        build_dir: Cow::Borrowed(&args.build_dir),
        case_timeout_secs: args.case_timeout,
        ..base_config(common)
    };

    let result = block_on_pipeline(common, |event, github, model, table| {
        let config = &config;
        async move {
            GradingProcessor::new(&table, &github, &model, config)
                .run_tests(&event)
                .await
        }
    });

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => return fail(&e, format, &mut std::io::stdout().lock()),
    };

    let code = print_test_outcome(&outcome, format, &mut std::io::stdout().lock());

    let report = match &outcome {
        TestRunOutcome::NothingToTest => return code,
        TestRunOutcome::Tested(report) => report,
    };
    if let Some(path) = clean_opt(&common.step_summary) {
        append_summary(path, &render::render_markdown(report));
    }
    if let Some(path) = clean_opt(&common.github_output) {
        let passed = report.passed().to_string();
        let total = report.total().to_string();
        write_outputs(
            path,
            &[
                ("language", report.language),
                ("entry_point", &report.entry_point),
                ("passed", &passed),
                ("total", &total),
                ("success", if report.all_passed() { "true" } else { "false" }),
            ],
        );
    }
    code
}

/// Print a finished test run and pick the exit code
fn print_test_outcome(outcome: &TestRunOutcome, format: OutputFormat, w: &mut impl Write) -> i32 {
    let report = match outcome {
        TestRunOutcome::NothingToTest => {
            if format == OutputFormat::Json {
                let _ = serde_json::to_writer(&mut *w, &render::nothing_to_test_json());
                let _ = writeln!(w);
            } else {
                let _ = writeln!(w, "No relevant code files changed in this push. Skipping functional tests.");
            }
            return 0;
        }
        TestRunOutcome::Tested(report) => report,
    };

    let summary = report.summary_line();
    match format {
        OutputFormat::Json => {
            let _ = serde_json::to_writer(&mut *w, &render::test_report_json(report));
            let _ = writeln!(w);
        }
        OutputFormat::Gha | OutputFormat::Text => {
            let _ = write!(w, "{}", render::render_text(report));
            if report.all_passed() {
                let _ = writeln!(w, "{}", summary);
            } else {
                let _ = writeln!(w, "{}", error_annotation(&summary));
            }
        }
    }

    if report.all_passed() {
        0
    } else {
        1
    }
}

fn run_review(args: &ReviewArgs) -> i32 {
    let common = &args.common;
    let format = OutputFormat::detect(common.output_format);
    let config = InputConfig {
        grader_dir: Cow::Borrowed(&args.grader_dir),
        workflows_dir: Cow::Borrowed(&args.workflows_dir),
        ..base_config(common)
    };

    let result = block_on_pipeline(common, |event, github, model, table| {
        let config = &config;
        async move {
            GradingProcessor::new(&table, &github, &model, config)
                .run_review(&event)
                .await
        }
    });

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => return fail(&e, format, &mut std::io::stdout().lock()),
    };

    let code = print_review_outcome(&outcome, format, &mut std::io::stdout().lock());

    if let ReviewOutcome::Reviewed { feedback, verdict } = &outcome {
        match clean_opt(&common.step_summary) {
            Some(path) => append_summary(path, feedback),
            None => tracing::info!("GITHUB_STEP_SUMMARY not set; feedback only printed to stdout"),
        }
        if let Some(path) = clean_opt(&common.github_output) {
            write_outputs(path, &[("verdict", verdict.as_str())]);
        }
    }
    code
}

/// Print a finished review and pick the exit code
fn print_review_outcome(outcome: &ReviewOutcome, format: OutputFormat, w: &mut impl Write) -> i32 {
    if format == OutputFormat::Json {
        let _ = serde_json::to_writer(&mut *w, &render::review_json(outcome));
        let _ = writeln!(w);
    }

    let (feedback, verdict) = match outcome {
        ReviewOutcome::Skipped(reason) => {
            if format != OutputFormat::Json {
                let _ = writeln!(w, "{}", reason);
            }
            return 0;
        }
        ReviewOutcome::Reviewed { feedback, verdict } => (feedback, verdict),
    };

    if format != OutputFormat::Json {
        let _ = writeln!(w, "--- AI Feedback ---");
        let _ = writeln!(w, "{}", feedback);
        let _ = writeln!(w, "-------------------");
        if *verdict == ReviewVerdict::Rejected {
            let _ = writeln!(
                w,
                "{}",
                error_annotation("Code was rejected by the AI reviewer. Check the step summary for details.")
            );
        }
    }

    match verdict {
        ReviewVerdict::Approved => 0,
        ReviewVerdict::Rejected => 1,
    }
}

/// Top-level handler for every fatal error
fn fail(err: &Error, format: OutputFormat, w: &mut impl Write) -> i32 {
    tracing::error!(kind = ?err.kind(), "{}", err);

    match format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "status": "error",
                "kind": format!("{:?}", err.kind()),
                "message": err.to_string(),
            });
            let _ = serde_json::to_writer(&mut *w, &out);
            let _ = writeln!(w);
        }
        OutputFormat::Gha | OutputFormat::Text => {
            let _ = writeln!(w, "{}", error_annotation(&err.to_string()));
        }
    }
    1
}

fn append_summary(path: &str, markdown: &str) {
    if let Err(e) = OutputWriter::append_step_summary(Path::new(path), markdown) {
        tracing::warn!(path, error = %e, "failed to write GITHUB_STEP_SUMMARY");
        println!("{}", warning_annotation(&format!("Failed to write step summary: {}", e)));
    }
}

fn write_outputs(path: &str, outputs: &[(&str, &str)]) {
    if let Err(e) = OutputWriter::write_outputs(Path::new(path), outputs) {
        tracing::warn!(path, error = %e, "failed to write GITHUB_OUTPUT");
    }
}
