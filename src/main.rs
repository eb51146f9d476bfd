//! prforge - publish commits and pull requests through the GitHub API
//!
//! CLI binary for publishing file changes to a repository without cloning.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "prforge")]
#[command(about = "Create commits and open pull requests through the GitHub API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish file changes as a commit plus pull request
    Publish {
        /// Target repository as owner/name
        #[arg(long)]
        repo: String,

        /// Branch to create or update
        #[arg(long)]
        branch: String,

        /// Base branch (defaults to the repository default branch)
        #[arg(long)]
        base: Option<String>,

        /// Commit message
        #[arg(long)]
        message: String,

        /// Pull request title
        #[arg(long)]
        title: String,

        /// Prefix prepended to every change path
        #[arg(long, default_value = "")]
        base_path: String,

        /// API base URL (for GitHub Enterprise)
        #[arg(long)]
        api: Option<String>,

        /// Token (defaults to gh CLI / GITHUB_TOKEN)
        #[arg(long)]
        token: Option<String>,

        /// Changes as dest=src pairs (src is a local file); plain paths
        /// are read from the same local path
        #[arg(required = true, value_name = "DEST=SRC")]
        changes: Vec<String>,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            repo,
            branch,
            base,
            message,
            title,
            base_path,
            api,
            token,
            changes,
        } => {
            cli::run_publish(cli::PublishArgs {
                repo,
                branch,
                base,
                message,
                title,
                base_path,
                api,
                token,
                changes,
            })
            .await?;
        }
        Commands::Auth { action } => match action {
            AuthAction::Test => cli::run_auth_test().await?,
            AuthAction::Setup => cli::run_auth_setup(),
        },
    }

    Ok(())
}
