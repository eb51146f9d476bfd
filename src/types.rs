//! Core types for pr-forge

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Git mode for a regular, non-executable file
pub const DEFAULT_FILE_MODE: &str = "100644";

/// Default API origin for github.com
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// A single file to create or overwrite in the published commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Path of the file within the repository (before `base_path` prefixing)
    pub path: String,
    /// Raw file contents (transport-encoded by the client)
    pub contents: Vec<u8>,
    /// Git file mode; defaults to [`DEFAULT_FILE_MODE`] when `None`
    pub mode: Option<String>,
}

impl Change {
    /// Create a change with the default file mode
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
            mode: None,
        }
    }

    /// The git mode this change will be written with
    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or(DEFAULT_FILE_MODE)
    }
}

/// Description of a set of file changes to publish as one commit plus PR
///
/// Constructed by the caller and consumed once by
/// [`publish`](crate::publish::publish). Duplicate `path`s are not rejected;
/// later entries overwrite earlier ones in the resulting tree.
#[derive(Debug, Clone)]
pub struct Changeset {
    /// Target repository as `owner/name`
    pub repository: String,
    /// Branch to create or update
    pub branch: String,
    /// Branch to base on; the repository default branch when `None`
    pub base_branch: Option<String>,
    /// Message for the created commit
    pub commit_message: String,
    /// Title for the created pull request
    pub pr_title: String,
    /// Files to create or overwrite
    pub changes: Vec<Change>,
    /// Prefix prepended to every change path
    pub base_path: String,
    /// Bearer token; resolved from `gh`/environment when `None`
    pub token: Option<String>,
    /// API base URL; [`DEFAULT_API_BASE`] when `None` (enterprise override)
    pub api: Option<String>,
}

impl Changeset {
    /// Create a changeset with defaults for the optional fields
    pub fn new(
        repository: impl Into<String>,
        branch: impl Into<String>,
        commit_message: impl Into<String>,
        pr_title: impl Into<String>,
        changes: Vec<Change>,
    ) -> Self {
        Self {
            repository: repository.into(),
            branch: branch.into(),
            base_branch: None,
            commit_message: commit_message.into(),
            pr_title: pr_title.into(),
            changes,
            base_path: String::new(),
            token: None,
            api: None,
        }
    }

    /// Path a change will occupy in the published tree
    pub fn effective_path(&self, change: &Change) -> String {
        format!("{}{}", self.base_path, change.path)
    }
}

/// A validated `owner/name` repository identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

fn repo_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^/]+/[^/]+$").unwrap())
}

impl RepoId {
    /// Parse and validate an `owner/name` identifier
    ///
    /// Rejected before any network call when the pattern does not match
    /// (zero or more than one `/`, or an empty side).
    pub fn parse(repository: &str) -> Result<Self> {
        if !repo_pattern().is_match(repository) {
            return Err(Error::InvalidRepository(repository.to_string()));
        }
        let (owner, name) = repository
            .split_once('/')
            .ok_or_else(|| Error::InvalidRepository(repository.to_string()))?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Commit author identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitAuthor {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
}

/// A commit object as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit SHA
    pub sha: String,
    /// Web URL for the commit
    #[serde(default)]
    pub html_url: String,
    /// Commit message
    #[serde(default)]
    pub message: String,
}

/// A pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
}

/// Result of a successful publish: the commit that landed and the open PR
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// Commit created by this run
    pub commit: CommitInfo,
    /// Pull request for the branch, newly created or pre-existing
    pub pr: PullRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_repo() {
        let repo = RepoId::parse("octocat/Hello-World").unwrap();
        assert_eq!(repo.owner, "octocat");
        assert_eq!(repo.name, "Hello-World");
        assert_eq!(repo.to_string(), "octocat/Hello-World");
    }

    #[test]
    fn test_reject_repo_without_slash() {
        assert!(matches!(
            RepoId::parse("not-a-repo"),
            Err(Error::InvalidRepository(_))
        ));
    }

    #[test]
    fn test_reject_repo_with_extra_slash() {
        assert!(matches!(
            RepoId::parse("a/b/c"),
            Err(Error::InvalidRepository(_))
        ));
    }

    #[test]
    fn test_reject_repo_with_empty_side() {
        assert!(RepoId::parse("/repo").is_err());
        assert!(RepoId::parse("owner/").is_err());
        assert!(RepoId::parse("/").is_err());
    }

    #[test]
    fn test_change_default_mode() {
        let change = Change::new("a.txt", "hello");
        assert_eq!(change.mode(), "100644");

        let executable = Change {
            mode: Some("100755".to_string()),
            ..Change::new("run.sh", "#!/bin/sh")
        };
        assert_eq!(executable.mode(), "100755");
    }

    #[test]
    fn test_effective_path_prefixes_base_path() {
        let mut changeset = Changeset::new(
            "owner/repo",
            "feat-x",
            "msg",
            "title",
            vec![Change::new("a.txt", "hello")],
        );
        changeset.base_path = "packages/app/".to_string();

        let path = changeset.effective_path(&changeset.changes[0]);
        assert_eq!(path, "packages/app/a.txt");
    }

    #[test]
    fn test_effective_path_empty_base_path() {
        let changeset = Changeset::new(
            "owner/repo",
            "feat-x",
            "msg",
            "title",
            vec![Change::new("a.txt", "hello")],
        );
        assert_eq!(changeset.effective_path(&changeset.changes[0]), "a.txt");
    }
}
