//! Phase 1: Remote state resolution
//!
//! Determines whether the target branch exists, which branch to base on,
//! and the tip commit/tree the new commit extends.

use crate::api::{GitHubClient, RefLookup};
use crate::error::{Error, Result};
use tracing::debug;

/// Remote state the writer builds on, derived once per run
///
/// Branching on existence here lets the writer treat "update existing
/// branch" and "create new branch" uniformly: both append one commit after
/// `parent_commit_sha`, differing only in whether the ref write is a
/// create or a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    /// Whether the target branch already exists
    pub branch_exists: bool,
    /// Branch used as the parent line of history (and the PR base)
    pub base_branch: String,
    /// Commit the new commit extends
    pub parent_commit_sha: String,
    /// Tree of the parent commit, inherited by the new tree
    pub parent_tree_sha: String,
}

/// Resolve the remote state for a target branch
///
/// The parent commit is the target branch's tip when the branch exists,
/// otherwise the base branch's tip. When neither can be found the run
/// fails with [`Error::Resolve`]; this is fatal, not retried.
pub async fn resolve_context(
    client: &GitHubClient,
    branch: &str,
    base_branch: Option<&str>,
) -> Result<ResolvedContext> {
    let branch_ref = client.get_branch_ref(branch).await?;

    let base_branch = match base_branch {
        Some(name) => name.to_string(),
        None => client.default_branch().await?,
    };

    let (branch_exists, parent_commit_sha) = match branch_ref {
        RefLookup::Found { sha } => (true, sha),
        RefLookup::NotFound => match client.branch_tip(&base_branch).await? {
            RefLookup::Found { sha } => (false, sha),
            RefLookup::NotFound => {
                return Err(Error::Resolve {
                    branch: branch.to_string(),
                    base: base_branch,
                });
            }
        },
    };

    let parent_tree_sha = client.commit_tree_sha(&parent_commit_sha).await?;

    debug!(
        branch_exists,
        %base_branch,
        %parent_commit_sha,
        %parent_tree_sha,
        "remote state resolved"
    );

    Ok(ResolvedContext {
        branch_exists,
        base_branch,
        parent_commit_sha,
        parent_tree_sha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepoId;

    fn client(server: &mockito::ServerGuard) -> GitHubClient {
        GitHubClient::new(
            "test-token",
            RepoId::parse("octo/demo").unwrap(),
            Some(&server.url()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_existing_branch_uses_its_tip() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/demo/git/refs/heads/feat-x")
            .with_status(200)
            .with_body(r#"{"object": {"sha": "tip1"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/demo/git/commits/tip1")
            .with_status(200)
            .with_body(r#"{"sha": "tip1", "tree": {"sha": "tree1"}}"#)
            .create_async()
            .await;
        // Base branch tip must not be queried when the branch exists
        let tip_mock = server
            .mock("GET", "/repos/octo/demo/branches/main")
            .expect(0)
            .create_async()
            .await;

        let ctx = resolve_context(&client(&server), "feat-x", Some("main"))
            .await
            .unwrap();

        assert!(ctx.branch_exists);
        assert_eq!(ctx.base_branch, "main");
        assert_eq!(ctx.parent_commit_sha, "tip1");
        assert_eq!(ctx.parent_tree_sha, "tree1");
        tip_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_new_branch_falls_back_to_default_branch_tip() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/demo/git/refs/heads/feat-x")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/demo")
            .with_status(200)
            .with_body(r#"{"default_branch": "main"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/demo/branches/main")
            .with_status(200)
            .with_body(r#"{"commit": {"sha": "c1"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/demo/git/commits/c1")
            .with_status(200)
            .with_body(r#"{"sha": "c1", "tree": {"sha": "t1"}}"#)
            .create_async()
            .await;

        let ctx = resolve_context(&client(&server), "feat-x", None)
            .await
            .unwrap();

        assert!(!ctx.branch_exists);
        assert_eq!(ctx.base_branch, "main");
        assert_eq!(ctx.parent_commit_sha, "c1");
        assert_eq!(ctx.parent_tree_sha, "t1");
    }

    #[tokio::test]
    async fn test_no_parent_anywhere_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/demo/git/refs/heads/feat-x")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/demo/branches/gone")
            .with_status(404)
            .create_async()
            .await;

        let err = resolve_context(&client(&server), "feat-x", Some("gone"))
            .await
            .unwrap_err();

        match err {
            Error::Resolve { branch, base } => {
                assert_eq!(branch, "feat-x");
                assert_eq!(base, "gone");
            }
            other => panic!("expected Resolve error, got {other:?}"),
        }
    }
}
