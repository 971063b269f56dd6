//! GitHub REST API client for commit file fetching

use crate::error::{Error, Result};
use crate::types::{CommitFile, FileStatus};
use serde::Deserialize;

/// Default public API endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub API response for commit details
#[derive(Debug, Deserialize)]
struct GitHubCommit {
    #[serde(default)]
    files: Vec<GitHubCommitFile>,
}

/// GitHub API response for a changed file
#[derive(Debug, Deserialize)]
struct GitHubCommitFile {
    /// File path
    filename: String,
    /// Change status (added, removed, modified, renamed, copied, changed)
    status: String,
}

/// GitHub API client for fetching commit details
pub struct GitHubApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    ///
    /// The token is required; GitHub commit details are fetched authenticated.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::Config(
                "GITHUB_TOKEN environment variable not set. Ensure the workflow has 'permissions: contents: read'".into(),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("hwcheck/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Runtime(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get files changed in a specific commit
    ///
    /// Endpoint: GET /repos/{owner}/{repo}/commits/{sha}
    /// One request, no retries. Any non-200 status is an error carrying the body.
    pub async fn get_commit_files(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<CommitFile>> {
        let url = format!("{}/repos/{}/{}/commits/{}", self.base_url, owner, repo, sha);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| Error::Http(format!("Error making GitHub API request: {}", e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!(
                "GitHub API request failed with status {} for commit {}: {}",
                status.as_u16(),
                sha,
                body
            )));
        }

        let commit: GitHubCommit = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("Error decoding GitHub API response: {}", e)))?;

        Ok(commit
            .files
            .into_iter()
            .map(|f| CommitFile::new(f.filename, FileStatus::parse(&f.status)))
            .collect())
    }
}
