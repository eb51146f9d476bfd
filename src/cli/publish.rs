//! Publish command - send file changes as a commit plus pull request

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use pr_forge::error::Error;
use pr_forge::publish::publish;
use pr_forge::types::{Change, Changeset};
use std::fs;

/// Arguments for the publish command
pub struct PublishArgs {
    /// Target repository as `owner/name`
    pub repo: String,
    /// Branch to create or update
    pub branch: String,
    /// Base branch, if not the repository default
    pub base: Option<String>,
    /// Commit message
    pub message: String,
    /// Pull request title
    pub title: String,
    /// Prefix prepended to every change path
    pub base_path: String,
    /// API base URL override
    pub api: Option<String>,
    /// Token override
    pub token: Option<String>,
    /// Changes as `dest=src` pairs
    pub changes: Vec<String>,
}

/// Run the publish command
pub async fn run_publish(args: PublishArgs) -> Result<()> {
    let mut changes = Vec::new();
    for entry in &args.changes {
        let (dest, src) = entry
            .split_once('=')
            .unwrap_or((entry.as_str(), entry.as_str()));
        let contents =
            fs::read(src).with_context(|| format!("failed to read change file `{src}`"))?;
        changes.push(Change::new(dest, contents));
    }

    println!(
        "Publishing {} change{} to {} ({})",
        changes.len(),
        if changes.len() == 1 { "" } else { "s" },
        args.repo,
        args.branch
    );

    let mut changeset = Changeset::new(args.repo, args.branch, args.message, args.title, changes);
    changeset.base_branch = args.base;
    changeset.base_path = args.base_path;
    changeset.api = args.api;
    changeset.token = args.token;

    match publish(&changeset).await {
        Ok(outcome) => {
            let check = "✓".if_supports_color(Stream::Stdout, |t| t.green());
            println!("  {check} commit {}", outcome.commit.sha);
            println!(
                "  {check} PR #{} {}",
                outcome.pr.number, outcome.pr.html_url
            );
            Ok(())
        }
        Err(e @ Error::Reconcile { .. }) => {
            // The commit and ref write landed; only the PR step failed.
            eprintln!(
                "{} branch `{}` was updated, but the pull request step failed",
                "!".if_supports_color(Stream::Stderr, |t| t.yellow()),
                changeset.branch
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
