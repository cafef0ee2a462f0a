//! Thin client for the GitHub repository contents API.
//!
//! Two calls: read the current file metadata (for its SHA) and PUT the
//! replacement content carrying that SHA. GitHub rejects the PUT when the
//! SHA is stale, which is the only concurrency control this service needs.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const USER_AGENT: &str = "content-publisher/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GithubError {
    /// The target file does not exist on the branch. Distinct from other
    /// API failures because it means the deployment is wired to the wrong
    /// repository (or the file was never pushed).
    #[error("{path} not found in repo \"{repo}\" on branch \"{branch}\"")]
    NotFound {
        repo: String,
        path: String,
        branch: String,
    },

    #[error("GitHub {method} {status}: {body}")]
    Api {
        method: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct GithubClient {
    http: Client,
    api_base: String,
    repo: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: &'a str,
    sha: &'a str,
    branch: &'a str,
}

impl GithubClient {
    pub fn new(api_base: String, repo: String, token: String) -> Result<Self, GithubError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            api_base,
            repo,
            token,
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/repos/{}/contents/{}", self.api_base, self.repo, path)
    }

    /// Fetch the current SHA of `path` on `branch`.
    pub async fn current_sha(&self, path: &str, branch: &str) -> Result<String, GithubError> {
        let resp = self
            .http
            .get(self.contents_url(path))
            .query(&[("ref", branch)])
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(GithubError::NotFound {
                repo: self.repo.clone(),
                path: path.to_string(),
                branch: branch.to_string(),
            });
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                method: "GET",
                status,
                body,
            });
        }

        let contents: ContentsResponse = resp.json().await?;
        Ok(contents.sha)
    }

    /// Commit `content` (base64) to `path` on `branch`, replacing the
    /// revision identified by `sha`.
    pub async fn put_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<(), GithubError> {
        let resp = self
            .http
            .put(self.contents_url(path))
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .json(&PutContents {
                message,
                content,
                sha,
                branch,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                method: "PUT",
                status,
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_upstream_status() {
        let err = GithubError::Api {
            method: "PUT",
            status: StatusCode::CONFLICT,
            body: "is at abc but expected def".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("409"));
        assert!(text.contains("PUT"));
    }

    #[test]
    fn test_not_found_names_repo_and_branch() {
        let err = GithubError::NotFound {
            repo: "acme/site".to_string(),
            path: "content.json".to_string(),
            branch: "main".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("acme/site"));
        assert!(text.contains("content.json"));
        assert!(text.contains("main"));
    }
}
