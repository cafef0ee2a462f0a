//! GitHub connection settings, injected into the handler at construction.
//!
//! The access token and repository are read once at startup but kept
//! optional: their absence is reported per request as a configuration
//! error naming the missing variables, so the service still starts (and
//! answers pre-flights, health checks and auth failures) on a
//! half-configured deployment.

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const GITHUB_REPO_VAR: &str = "GITHUB_REPO";

#[derive(Debug, Clone)]
pub struct GithubSettings {
    /// Personal access token with `repo` scope.
    pub token: Option<String>,
    /// Target repository as `owner/name`.
    pub repo: Option<String>,
    /// Branch to read and commit on.
    pub branch: String,
    /// Path of the content file inside the repository.
    pub content_path: String,
    /// GitHub API base URL.
    pub api_base: String,
}

impl GithubSettings {
    /// Build settings from the process environment plus the CLI-provided
    /// non-secret fields.
    pub fn from_env(branch: String, content_path: String, api_base: String) -> Self {
        Self {
            token: env_nonempty(GITHUB_TOKEN_VAR),
            repo: env_nonempty(GITHUB_REPO_VAR),
            branch,
            content_path,
            api_base,
        }
    }

    /// Names of required secrets that are absent.
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.token.is_none() {
            missing.push(GITHUB_TOKEN_VAR);
        }
        if self.repo.is_none() {
            missing.push(GITHUB_REPO_VAR);
        }
        missing
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
