use assert_matches::assert_matches;
use hwcheck_core::http::{GeminiClient, GeminiConfig, GitHubApiClient};
use hwcheck_core::{CompletionError, FileStatus, ResponseFormat, TextGenerator};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gemini(server: &MockServer) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: Some("test-key".into()),
        model: "gemini-2.0-flash".into(),
        base_url: server.uri(),
        ..GeminiConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_commit_files_parsed_with_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/hw/commits/deadbeef"))
        .and(header("Accept", "application/vnd.github+json"))
        .and(header("X-GitHub-Api-Version", "2022-11-28"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sha": "deadbeef",
            "files": [
                {"filename": "RD.java", "status": "added", "additions": 10},
                {"filename": "old.cpp", "status": "removed"},
                {"filename": "x.py", "status": "renamed"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GitHubApiClient::new(server.uri(), "tok").unwrap();
    let files = client.get_commit_files("octo", "hw", "deadbeef").await.unwrap();
    assert_eq!(files.len(), 3);
    assert_eq!(files[0].filename, "RD.java");
    assert_eq!(files[0].status, FileStatus::Added);
    assert_eq!(files[1].status, FileStatus::Removed);
    assert_eq!(files[2].status, FileStatus::Renamed);
}

#[tokio::test]
async fn test_commit_without_files_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"sha": "x"})))
        .mount(&server)
        .await;

    let client = GitHubApiClient::new(server.uri(), "tok").unwrap();
    assert!(client.get_commit_files("o", "r", "x").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_commit_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = GitHubApiClient::new(server.uri(), "tok").unwrap();
    let err = client.get_commit_files("o", "r", "x").await.unwrap_err();
    assert_eq!(err.kind(), hwcheck_core::ErrorKind::Http);
}

#[tokio::test]
async fn test_gemini_json_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "{\"test_cases\": []}"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini(&server)
        .generate("make tests", ResponseFormat::Json)
        .await
        .unwrap();
    assert_eq!(text, "{\"test_cases\": []}");
}

#[tokio::test]
async fn test_gemini_prompt_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [{"text": "pick one\nmain.py"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "main.py"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = gemini(&server)
        .generate("pick one\nmain.py", ResponseFormat::Text)
        .await
        .unwrap();
    assert_eq!(text, "main.py");
}

#[tokio::test]
async fn test_gemini_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = gemini(&server)
        .generate("p", ResponseFormat::Text)
        .await
        .unwrap_err();
    assert_matches!(err, CompletionError::Status { status: 429, ref body } if body == "quota exceeded");
}

#[tokio::test]
async fn test_gemini_empty_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = gemini(&server)
        .generate("p", ResponseFormat::Text)
        .await
        .unwrap_err();
    assert_matches!(err, CompletionError::EmptyResponse);
}

#[tokio::test]
async fn test_gemini_unreachable() {
    let client = GeminiClient::new(GeminiConfig {
        api_key: Some("k".into()),
        base_url: "http://127.0.0.1:9".into(),
        ..GeminiConfig::default()
    })
    .unwrap();
    let err = client.generate("p", ResponseFormat::Text).await.unwrap_err();
    assert_matches!(err, CompletionError::Transport(_));
}
