//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{login::LoginArgs, track_url::TrackUrlArgs, url::UrlArgs};

/// Qobuz API request signing and session tool.
#[derive(Parser, Debug)]
#[command(name = "qobuz")]
#[command(author, version = env!("QOBUZ_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings that override the config file.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Config file (defaults to the platform config dir, e.g. ~/.config/qobuz/config.json)
    #[arg(long, env = "QOBUZ_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API base URL
    #[arg(long, env = "QOBUZ_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Application id
    #[arg(long, env = "QOBUZ_APP_ID", global = true)]
    pub app_id: Option<String>,

    /// Application secret used to sign requests
    #[arg(long, env = "QOBUZ_APP_SECRET", global = true, hide_env_values = true)]
    pub app_secret: Option<String>,

    /// Account username
    #[arg(long, env = "QOBUZ_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account email (used when no username is given)
    #[arg(long, env = "QOBUZ_EMAIL", global = true)]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "QOBUZ_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Device manufacturer id sent with the login
    #[arg(long, env = "QOBUZ_DEVICE_ID", global = true)]
    pub device_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a request URL, optionally signed
    Url(UrlArgs),

    /// Log in and report the session
    Login(LoginArgs),

    /// Log in and resolve the streaming URL of a track
    TrackUrl(TrackUrlArgs),
}
