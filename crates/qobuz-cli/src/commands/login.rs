//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use qobuz_client::ClientConfig;

use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Print the user auth token instead of redacting it
    #[arg(long)]
    pub show_token: bool,
}

pub async fn run(args: LoginArgs, config: &ClientConfig) -> Result<()> {
    let (client, _transport) = super::connect(config)?;

    eprintln!("{}", "Logging in...".dimmed());
    let session = client.session().await.context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("Account", config.credentials().identifier());
    if let Some(user_id) = session.user_id() {
        output::field("User ID", &user_id.to_string());
    }
    if args.show_token {
        output::field("Token", session.user_auth_token().as_str());
    } else {
        output::field("Token", "[REDACTED] (use --show-token)");
    }

    Ok(())
}
