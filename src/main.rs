use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use content_publisher::auth::JwtIdentity;
use content_publisher::config::GithubSettings;
use content_publisher::http::{self, AppState};

#[derive(Parser)]
#[command(
    name = "content-publisher",
    about = "Commit admin content edits to a GitHub-backed site"
)]
struct Cli {
    /// HTTP listen port
    #[arg(long, default_value = "9300", env = "CONTENT_PUBLISHER_PORT")]
    port: u16,

    /// Branch to read and commit on
    #[arg(long, default_value = "main", env = "CONTENT_BRANCH")]
    branch: String,

    /// Path of the content file inside the repository
    #[arg(long, default_value = "content.json", env = "CONTENT_PATH")]
    content_path: String,

    /// GitHub API base URL
    #[arg(long, default_value = "https://api.github.com", env = "GITHUB_API_BASE")]
    github_api_base: String,

    /// Shared secret for verifying admin identity tokens (HS256)
    #[arg(long, env = "IDENTITY_SECRET")]
    identity_secret: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("content_publisher=info")),
        )
        .init();

    let cli = Cli::parse();

    let github = GithubSettings::from_env(cli.branch, cli.content_path, cli.github_api_base);
    let missing = github.missing_secrets();
    if !missing.is_empty() {
        tracing::warn!(
            ?missing,
            "GitHub secrets not configured; saves will fail until they are set"
        );
    }

    let state = Arc::new(AppState {
        identity: Arc::new(JwtIdentity::new(cli.identity_secret.as_bytes())),
        github,
    });

    let app = http::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!(%addr, "content-publisher listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listen address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
