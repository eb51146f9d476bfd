//! Phase 2: Object-graph writing and PR reconciliation
//!
//! Uploads one blob per change (concurrently), layers a tree over the
//! parent tree, creates the commit, moves the branch ref, and ensures
//! exactly one open pull request exists for the branch.

use crate::api::{GitHubClient, TreeEntry};
use crate::auth::resolve_token;
use crate::error::{Error, Result};
use crate::identity;
use crate::publish::resolve_context;
use crate::types::{Changeset, PublishOutcome, PullRequest, RepoId};
use futures::future::join_all;
use tracing::debug;

/// Publish a changeset as one commit plus an open pull request
///
/// Validates the repository identifier and resolves a token before any
/// network call, then runs the full pipeline. See [`publish_with_client`]
/// for the pipeline itself.
pub async fn publish(changeset: &Changeset) -> Result<PublishOutcome> {
    let repo = RepoId::parse(&changeset.repository)?;
    let auth = resolve_token(changeset.token.as_deref()).await?;
    let client = GitHubClient::new(auth.token, repo, changeset.api.as_deref())?;

    publish_with_client(&client, changeset).await
}

/// Run the publish pipeline against an already-constructed client
///
/// Steps: resolve remote state, upload blobs, create the tree and commit,
/// create or move the branch ref, reconcile the pull request. Any step's
/// failure aborts the rest; objects already created are left in place (the
/// content-addressed store treats them as harmless garbage). A failure
/// after the ref write is reported as [`Error::Reconcile`] so the caller
/// knows the branch was updated even though no PR resulted.
pub async fn publish_with_client(
    client: &GitHubClient,
    changeset: &Changeset,
) -> Result<PublishOutcome> {
    debug!(repo = %client.repo(), branch = %changeset.branch, "publishing changeset");

    let ctx = resolve_context(client, &changeset.branch, changeset.base_branch.as_deref()).await?;

    // Blob uploads have no ordering dependency on each other. All requests
    // run to completion; the first failure (in changeset order) is reported
    // with its path.
    let uploads = changeset.changes.iter().map(|change| {
        let path = changeset.effective_path(change);
        async move {
            match client.create_blob(&change.contents).await {
                Ok(sha) => Ok(TreeEntry::blob(path, change.mode().to_string(), sha)),
                Err(e) => Err(Error::Blob {
                    path,
                    source: Box::new(e),
                }),
            }
        }
    });
    let entries: Vec<TreeEntry> = join_all(uploads).await.into_iter().collect::<Result<_>>()?;
    debug!(blobs = entries.len(), "all blobs uploaded");

    let tree_sha = client.create_tree(&ctx.parent_tree_sha, &entries).await?;

    let author = identity::resolve_author().await;
    let commit = client
        .create_commit(
            &changeset.commit_message,
            &tree_sha,
            &ctx.parent_commit_sha,
            &author,
        )
        .await?;

    // The create/move decision follows the resolver's existence flag
    // exactly; no second existence check is made.
    if ctx.branch_exists {
        client.update_ref(&changeset.branch, &commit.sha).await?;
    } else {
        client.create_ref(&changeset.branch, &commit.sha).await?;
    }

    let pr = reconcile_pr(client, &changeset.branch, &ctx.base_branch, &changeset.pr_title)
        .await
        .map_err(|e| Error::Reconcile {
            commit_sha: commit.sha.clone(),
            source: Box::new(e),
        })?;

    Ok(PublishOutcome { commit, pr })
}

/// Ensure exactly one open PR exists with head = `branch`
///
/// An already-open PR short-circuits creation, which makes repeated runs
/// for the same branch safe. The title from a later run is not applied to
/// a pre-existing PR.
async fn reconcile_pr(
    client: &GitHubClient,
    branch: &str,
    base: &str,
    title: &str,
) -> Result<PullRequest> {
    let open = client.list_open_pulls(branch).await?;
    if let Some(pr) = open.into_iter().next() {
        debug!(number = pr.number, "open pull request already exists");
        return Ok(pr);
    }

    client.create_pull(title, branch, base).await
}
