//! GitHub push event payload parsing

use crate::error::{Error, Result};
use crate::types::{PushCommit, PushEvent};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct RawPushEvent {
    #[serde(default)]
    head_commit: Option<RawHeadCommit>,
    #[serde(default)]
    repository: Option<RawRepository>,
    #[serde(default)]
    commits: Vec<PushCommit>,
}

#[derive(Debug, Default, Deserialize)]
struct RawHeadCommit {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawRepository {
    #[serde(default)]
    name: String,
    #[serde(default)]
    owner: Option<RawOwner>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOwner {
    #[serde(default)]
    login: String,
}

/// Parse a push event from payload text
///
/// Fails when the JSON is malformed or when the head commit SHA, owner
/// login, or repository name is missing or empty.
pub fn parse_push_event(payload: &str) -> Result<PushEvent> {
    let raw: RawPushEvent = serde_json::from_str(payload).map_err(|e| {
        Error::EventParse(format!("Failed to unmarshal GitHub push event payload: {}", e))
    })?;

    let head_sha = raw.head_commit.map(|c| c.id).unwrap_or_default();
    let (repo, owner) = match raw.repository {
        Some(r) => (r.name, r.owner.map(|o| o.login).unwrap_or_default()),
        None => (String::new(), String::new()),
    };

    if head_sha.is_empty() || owner.is_empty() || repo.is_empty() {
        return Err(Error::EventParse(
            "Could not extract commit SHA, repo owner, or repo name from event payload".into(),
        ));
    }

    Ok(PushEvent {
        head_sha,
        owner,
        repo,
        commits: raw.commits,
    })
}

/// Read and parse the payload file at `path`
pub async fn load_push_event(path: &Path) -> Result<PushEvent> {
    let payload = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::EventParse(format!(
            "Failed to read event payload {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_push_event(&payload)
}
