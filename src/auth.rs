//! Token resolution for the GitHub API
//!
//! Supports tokens supplied directly on the changeset, the `gh` CLI, and
//! environment variables.

use crate::error::{Error, Result};
use crate::types::DEFAULT_API_BASE;
use serde::Deserialize;
use std::env;
use tokio::process::Command;
use tracing::debug;

/// Source of an authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token supplied on the changeset itself
    Changeset,
    /// Token from the `gh` CLI session
    Cli,
    /// Token from an environment variable
    EnvVar,
}

/// A resolved token and where it came from
#[derive(Debug, Clone)]
pub struct TokenAuth {
    /// Bearer token for API requests
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Resolve a usable token
///
/// Priority:
/// 1. Token supplied by the caller (changeset field)
/// 2. `gh` CLI (`gh auth token`)
/// 3. `GITHUB_TOKEN` environment variable
/// 4. `GH_TOKEN` environment variable
///
/// Failure is fatal and reported before any API call is made.
pub async fn resolve_token(explicit: Option<&str>) -> Result<TokenAuth> {
    if let Some(token) = explicit {
        return Ok(TokenAuth {
            token: token.to_string(),
            source: AuthSource::Changeset,
        });
    }

    if let Some(token) = gh_cli_token().await {
        debug!("token resolved from gh CLI");
        return Ok(TokenAuth {
            token,
            source: AuthSource::Cli,
        });
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.is_empty() {
                debug!(%var, "token resolved from environment");
                return Ok(TokenAuth {
                    token,
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    Err(Error::Auth(
        "no GitHub token found; run `gh auth login` or set GITHUB_TOKEN".to_string(),
    ))
}

async fn gh_cli_token() -> Option<String> {
    // Check gh is available
    Command::new("gh").arg("--version").output().await.ok()?;

    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}

#[derive(Deserialize)]
struct User {
    login: String,
}

/// Validate a token against the API, returning the authenticated login
pub async fn test_token(token: &str, api: Option<&str>) -> Result<String> {
    let api = api.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/');
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{api}/user"))
        .header("authorization", format!("token {token}"))
        .header("accept", "application/vnd.github+json")
        .header("user-agent", concat!("pr-forge/", env!("CARGO_PKG_VERSION")))
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Auth(format!("token rejected with status {status}")));
    }

    let user: User = resp.json().await?;
    Ok(user.login)
}
