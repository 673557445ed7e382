//! Subcommand implementations.

pub mod login;
pub mod track_url;
pub mod url;

use anyhow::{Context, Result};
use tracing::debug;

use qobuz_client::{ClientConfig, EventLoop, HttpTransport, QobuzClient};

use crate::cli::Commands;

pub async fn handle(command: Commands, config: ClientConfig) -> Result<()> {
    match command {
        Commands::Url(args) => url::run(args, &config),
        Commands::Login(args) => login::run(args, &config).await,
        Commands::TrackUrl(args) => track_url::run(args, &config).await,
    }
}

/// Wire a session manager to an HTTP transport the caller can also use for
/// authenticated requests.
fn connect(config: &ClientConfig) -> Result<(QobuzClient, HttpTransport)> {
    config.validate().context("Incomplete configuration")?;
    config
        .credentials()
        .validate()
        .context("Incomplete credentials")?;

    let transport = HttpTransport::new(config).context("Failed to create HTTP client")?;
    let event_loop = EventLoop::spawn().context("Failed to start event loop")?;
    let client = QobuzClient::builder(
        config.url_builder(),
        config.credentials(),
        transport.clone(),
        event_loop,
    )
    .build();

    debug!(?client, "Client ready");
    Ok((client, transport))
}
