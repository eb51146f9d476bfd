//! pr-forge - create commits and pull requests through the GitHub API
//!
//! Publishes a [`Changeset`](types::Changeset) as a single commit plus an
//! open pull request using only the remote object-graph API - no local
//! clone is read or written. The pipeline reads the current ref, resolves
//! the parent commit and tree, uploads blobs, layers a new tree, creates
//! the commit, creates or moves the branch ref, and ensures exactly one
//! open PR exists for the branch.
//!
//! ```no_run
//! use pr_forge::publish::publish;
//! use pr_forge::types::{Change, Changeset};
//!
//! # async fn run() -> pr_forge::error::Result<()> {
//! let changeset = Changeset::new(
//!     "octocat/Hello-World",
//!     "automation/update-config",
//!     "chore: update config",
//!     "Update config",
//!     vec![Change::new("config.toml", "key = \"value\"\n")],
//! );
//! let outcome = publish(&changeset).await?;
//! println!("opened PR #{}", outcome.pr.number);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod identity;
pub mod publish;
pub mod types;
