//! Content Publisher
//!
//! A single-endpoint HTTP service that lets an authenticated admin save a
//! JSON content document into a GitHub repository. The save is a
//! read-modify-write against the GitHub contents API: fetch the current
//! file SHA, then PUT the new content with that SHA so a concurrent edit
//! is rejected by GitHub instead of silently overwritten.
//!
//! ## Key Components
//!
//! - **`http`**: the Axum router and the `/save-content` handler
//! - **`auth`**: explicit identity provider seam (JWT bearer tokens)
//! - **`github`**: thin client for the GitHub contents API
//! - **`content`**: payload schema check and commit encoding
//! - **`config`**: injected GitHub connection settings

pub mod auth;
pub mod config;
pub mod content;
pub mod github;
pub mod http;

pub use auth::{IdentityProvider, JwtIdentity, Principal};
pub use config::GithubSettings;
pub use github::{GithubClient, GithubError};
pub use http::{router, AppState};
