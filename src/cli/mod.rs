//! CLI commands
//!
//! Command implementations for the `prforge` binary.

mod auth;
mod publish;

pub use auth::{run_auth_setup, run_auth_test};
pub use publish::{PublishArgs, run_publish};
