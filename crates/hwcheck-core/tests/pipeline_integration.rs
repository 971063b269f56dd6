//! End-to-end pipeline tests
//!
//! GitHub is served by wiremock, the model is a ScriptedGenerator and the
//! student programs are `sh` scripts, so no toolchain or network is needed.

use hwcheck_core::http::{GitHubApiClient, ScriptedGenerator};
use hwcheck_core::language::{Arg, CommandTemplate, LanguageProfile, LanguageTable};
use hwcheck_core::{
    Error, ErrorKind, GradingProcessor, InputConfig, PushEvent, ResponseFormat, ReviewOutcome,
    ReviewVerdict, TestRunOutcome,
};
use assert_matches::assert_matches;
use std::borrow::Cow;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHELL: LanguageProfile = LanguageProfile {
    name: "Shell",
    glob: "*.sh",
    compile: None,
    run: CommandTemplate::new(&[Arg::Literal("sh"), Arg::EntryFile]),
};

const SUM_CASES: &str = r#"```json
{"test_cases": [
  {"description": "positives", "input": "3 4", "expected_output": "7"},
  {"description": "cancel out", "input": "-1 1", "expected_output": "0"}
]}
```"#;

const INSTRUCTIONS: &str = "Read two integers from stdin and print their sum.";

fn event() -> PushEvent {
    PushEvent {
        head_sha: "abc123".into(),
        owner: "student".into(),
        repo: "hw0".into(),
        commits: Vec::new(),
    }
}

async fn github_with(files: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/student/hw0/commits/abc123"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "files": files })))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn file(name: &str, status: &str) -> serde_json::Value {
    serde_json::json!({ "filename": name, "status": status })
}

/// Repository fixture with the instructions file and the given sources
fn repo(sources: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("homework0e3.txt"), INSTRUCTIONS).unwrap();
    for (name, body) in sources {
        let full = dir.path().join(name);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, body).unwrap();
    }
    dir
}

fn config(root: &Path) -> InputConfig<'_> {
    InputConfig {
        repo_root: Cow::Owned(root.to_string_lossy().into_owned()),
        build_dir: Cow::Owned(root.to_string_lossy().into_owned()),
        case_timeout_secs: 5,
        ..Default::default()
    }
}

async fn run_tests(
    table: &LanguageTable,
    server: &MockServer,
    model: &ScriptedGenerator,
    root: &Path,
) -> hwcheck_core::Result<TestRunOutcome> {
    let github = GitHubApiClient::new(server.uri(), "test-token").unwrap();
    let config = config(root);
    GradingProcessor::new(table, &github, model, &config)
        .run_tests(&event())
        .await
}

#[tokio::test]
async fn test_zero_relevant_files_skips_model() {
    let server = github_with(serde_json::json!([
        file("README.md", "added"),
        file("old.py", "removed"),
    ]))
    .await;
    let model = ScriptedGenerator::new();
    let dir = repo(&[]);
    let table = LanguageTable::builtin().unwrap();

    let outcome = run_tests(&table, &server, &model, dir.path()).await.unwrap();
    assert_matches!(outcome, TestRunOutcome::NothingToTest);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_mixed_languages_is_fatal() {
    let server = github_with(serde_json::json!([
        file("main.py", "added"),
        file("RD.java", "modified"),
    ]))
    .await;
    let model = ScriptedGenerator::new();
    let dir = repo(&[]);
    let table = LanguageTable::builtin().unwrap();

    let err = run_tests(&table, &server, &model, dir.path()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MixedLanguages);
    assert!(err.message().contains("Python"));
    assert!(err.message().contains("Java"));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_summing_program_passes_all() {
    let server = github_with(serde_json::json!([file("sum.sh", "added")])).await;
    let model = ScriptedGenerator::with_replies([SUM_CASES]);
    let dir = repo(&[("sum.sh", "read a b\necho $((a + b))\n")]);
    let table = LanguageTable::new(&[SHELL]).unwrap();

    let outcome = run_tests(&table, &server, &model, dir.path()).await.unwrap();
    let TestRunOutcome::Tested(report) = outcome else {
        panic!("expected a test run");
    };
    assert_eq!(report.passed(), 2);
    assert_eq!(report.total(), 2);
    assert!(report.all_passed());
    assert_eq!(report.entry_point, "sum.sh");
    assert_eq!(
        report.summary_line(),
        "Passed 2 out of 2 test cases for the Shell project."
    );

    // Single candidate: the only model call is test generation.
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].1, ResponseFormat::Json);
    assert!(prompts[0].0.contains(INSTRUCTIONS));
}

#[tokio::test]
async fn test_constant_program_fails_one() {
    let server = github_with(serde_json::json!([file("sum.sh", "modified")])).await;
    let model = ScriptedGenerator::with_replies([SUM_CASES]);
    let dir = repo(&[("sum.sh", "echo 0\n")]);
    let table = LanguageTable::new(&[SHELL]).unwrap();

    let outcome = run_tests(&table, &server, &model, dir.path()).await.unwrap();
    let TestRunOutcome::Tested(report) = outcome else {
        panic!("expected a test run");
    };
    assert_eq!(report.passed(), 1);
    assert_eq!(report.total(), 2);
    assert!(!report.all_passed());
    assert!(!report.outcomes[0].passed());
    assert!(report.outcomes[1].passed());
}

#[tokio::test]
async fn test_model_picks_entry_point() {
    let server = github_with(serde_json::json!([
        file("hw/helper.sh", "added"),
        file("hw/main.sh", "added"),
    ]))
    .await;
    let model = ScriptedGenerator::with_replies(["main.sh\n", SUM_CASES]);
    let dir = repo(&[
        ("hw/helper.sh", "echo helper\n"),
        ("hw/main.sh", "read a b\necho $((a + b))\n"),
    ]);
    let table = LanguageTable::new(&[SHELL]).unwrap();

    let outcome = run_tests(&table, &server, &model, dir.path()).await.unwrap();
    let TestRunOutcome::Tested(report) = outcome else {
        panic!("expected a test run");
    };
    assert_eq!(report.entry_point, "main.sh");
    assert!(report.all_passed());

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0].1, ResponseFormat::Text);
    assert!(prompts[0].0.contains("helper.sh\nmain.sh"));
}

#[tokio::test]
async fn test_invalid_entry_point_choice_stops_pipeline() {
    let server = github_with(serde_json::json!([
        file("a.sh", "added"),
        file("b.sh", "added"),
    ]))
    .await;
    let model = ScriptedGenerator::with_replies(["c.sh", SUM_CASES]);
    let dir = repo(&[("a.sh", "echo a\n"), ("b.sh", "echo b\n")]);
    let table = LanguageTable::new(&[SHELL]).unwrap();

    let err = run_tests(&table, &server, &model, dir.path()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EntryPoint);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_missing_instructions_is_fatal() {
    let server = github_with(serde_json::json!([file("sum.sh", "added")])).await;
    let model = ScriptedGenerator::with_replies([SUM_CASES]);
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("sum.sh"), "echo 0\n").unwrap();
    let table = LanguageTable::new(&[SHELL]).unwrap();

    let err = run_tests(&table, &server, &model, dir.path()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Instructions);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_undecodable_cases_are_fatal() {
    let server = github_with(serde_json::json!([file("sum.sh", "added")])).await;
    let model = ScriptedGenerator::with_replies(["Sorry, I can't do that."]);
    let dir = repo(&[("sum.sh", "echo 0\n")]);
    let table = LanguageTable::new(&[SHELL]).unwrap();

    let err = run_tests(&table, &server, &model, dir.path()).await.unwrap_err();
    assert_matches!(err, Error::TestGeneration(_));
}

#[tokio::test]
async fn test_github_error_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Not Found"}"#))
        .mount(&server)
        .await;
    let model = ScriptedGenerator::new();
    let dir = repo(&[]);
    let table = LanguageTable::builtin().unwrap();

    let err = run_tests(&table, &server, &model, dir.path()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert!(err.message().contains("404"));
    assert!(err.message().contains("Not Found"));
}

#[tokio::test]
async fn test_review_rejected() {
    let server = github_with(serde_json::json!([
        file("correctness-tester/main.go", "modified"),
        file(".github/workflows/grade.yml", "added"),
        file("homework0e3.txt", "modified"),
        file("dedup.py", "added"),
        file("gone.py", "removed"),
    ]))
    .await;
    let model = ScriptedGenerator::with_replies(["Rejected: repeated characters are kept."]);
    let dir = repo(&[("dedup.py", "print(input())\n")]);
    let github = GitHubApiClient::new(server.uri(), "test-token").unwrap();
    let config = config(dir.path());

    let outcome = GradingProcessor::new(&LanguageTable::builtin().unwrap(), &github, &model, &config)
        .run_review(&event())
        .await
        .unwrap();

    let ReviewOutcome::Reviewed { verdict, feedback } = outcome else {
        panic!("expected a review");
    };
    assert_eq!(verdict, ReviewVerdict::Rejected);
    assert!(feedback.contains("repeated"));

    let (prompt, format) = &model.prompts()[0];
    assert_eq!(*format, ResponseFormat::Text);
    assert!(prompt.contains("--- File: dedup.py ---\nprint(input())"));
    assert!(prompt.contains(INSTRUCTIONS));
    assert!(!prompt.contains("correctness-tester"));
    assert!(!prompt.contains("gone.py"));
}

#[tokio::test]
async fn test_review_skips_internal_only_push() {
    let server = github_with(serde_json::json!([
        file("correctness-tester/main.go", "modified"),
        file(".github/workflows/grade.yml", "added"),
    ]))
    .await;
    let model = ScriptedGenerator::new();
    let dir = repo(&[]);
    let github = GitHubApiClient::new(server.uri(), "test-token").unwrap();
    let config = config(dir.path());

    let outcome = GradingProcessor::new(&LanguageTable::builtin().unwrap(), &github, &model, &config)
        .run_review(&event())
        .await
        .unwrap();
    assert_matches!(outcome, ReviewOutcome::Skipped(_));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_review_skips_when_nothing_readable() {
    let server = github_with(serde_json::json!([file("ghost.py", "added")])).await;
    let model = ScriptedGenerator::new();
    let dir = repo(&[]);
    let github = GitHubApiClient::new(server.uri(), "test-token").unwrap();
    let config = config(dir.path());

    let outcome = GradingProcessor::new(&LanguageTable::builtin().unwrap(), &github, &model, &config)
        .run_review(&event())
        .await
        .unwrap();
    assert_matches!(outcome, ReviewOutcome::Skipped(_));
    assert_eq!(model.calls(), 0);
}
