//! Commit author resolution from local git configuration
//!
//! Publishing should not be blocked by a missing local identity, so lookup
//! failures fall back to a placeholder instead of erroring.

use crate::types::GitAuthor;
use tokio::process::Command;
use tracing::debug;

const PLACEHOLDER: &str = "fixme";

/// Resolve the commit author from `git config`, with a placeholder fallback
pub async fn resolve_author() -> GitAuthor {
    let name = git_config("user.name")
        .await
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let email = git_config("user.email")
        .await
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    debug!(%name, %email, "resolved commit author");
    GitAuthor { name, email }
}

async fn git_config(key: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--get", key])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unset_key_is_none() {
        assert_eq!(git_config("prforge.no-such-key").await, None);
    }

    #[tokio::test]
    async fn test_resolve_author_never_empty() {
        let author = resolve_author().await;
        assert!(!author.name.is_empty());
        assert!(!author.email.is_empty());
    }
}
