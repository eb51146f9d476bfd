//! Error types for pr-forge

use thiserror::Error;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the publish pipeline
///
/// Each variant maps to one failure class of the pipeline so callers can
/// tell which step failed without replaying the sequence.
#[derive(Debug, Error)]
pub enum Error {
    /// Repository identifier does not match `owner/name`
    #[error("invalid repository `{0}` (expected `owner/name`)")]
    InvalidRepository(String),

    /// No usable token could be resolved
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Neither the target branch nor the base branch resolves to a commit
    #[error("could not find a parent commit from `{branch}` or `{base}`")]
    Resolve {
        /// Target branch that was checked first
        branch: String,
        /// Base branch used as the fallback
        base: String,
    },

    /// A blob upload failed for one specific file
    #[error("blob upload failed for `{path}`: {source}")]
    Blob {
        /// Effective path of the change whose upload failed
        path: String,
        /// Underlying API error
        #[source]
        source: Box<Error>,
    },

    /// The remote API rejected a request
    #[error("{step} failed with status {status}: {body}")]
    Api {
        /// Pipeline step that issued the request
        step: &'static str,
        /// HTTP status returned by the API
        status: u16,
        /// Response body, for diagnosis
        body: String,
    },

    /// The branch was updated but the pull request step failed
    #[error("branch updated to commit {commit_sha}, but PR reconciliation failed: {source}")]
    Reconcile {
        /// Commit the branch now points at (the change is not lost)
        commit_sha: String,
        /// Error from the PR list/create step
        #[source]
        source: Box<Error>,
    },

    /// A value could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// HTTP transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
