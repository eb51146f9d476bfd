//! Auth command - test and manage authentication

use anyhow::Result;
use pr_forge::auth::{resolve_token, test_token};

/// Run the auth test command
pub async fn run_auth_test() -> Result<()> {
    println!("Testing GitHub authentication...");
    let auth = resolve_token(None).await?;
    let login = test_token(&auth.token, None).await?;
    println!("Authenticated as: {login}");
    println!("Token source: {:?}", auth.source);
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("GitHub Authentication Setup");
    println!("===========================");
    println!();
    println!("Option 1: GitHub CLI (recommended)");
    println!("  Install: https://cli.github.com/");
    println!("  Run: gh auth login");
    println!();
    println!("Option 2: Environment variable");
    println!("  Set GITHUB_TOKEN or GH_TOKEN");
    println!();
    println!("Option 3: Pass --token to the publish command");
    println!();
    println!("For GitHub Enterprise:");
    println!("  Pass --api https://<host>/api/v3");
}
