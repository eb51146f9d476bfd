//! Two-phase publish pipeline
//!
//! 1. Resolve - determine the base branch and the commit/tree to extend
//! 2. Execute - upload blobs, build the tree and commit, move the ref, and
//!    reconcile the pull request

mod execute;
mod resolve;

pub use execute::{publish, publish_with_client};
pub use resolve::{ResolvedContext, resolve_context};
