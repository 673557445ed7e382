//! Track URL command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::warn;

use qobuz_client::ClientConfig;
use qobuz_core::Error;

use crate::output;

#[derive(Args, Debug)]
pub struct TrackUrlArgs {
    /// Track id
    pub track_id: String,

    /// Audio format id (defaults to the configured one)
    #[arg(long)]
    pub format_id: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TrackUrlOutput<'a> {
    track_id: &'a str,
    format_id: &'a str,
    url: &'a str,
}

pub async fn run(args: TrackUrlArgs, config: &ClientConfig) -> Result<()> {
    let format_id = args.format_id.as_deref().unwrap_or(&config.format_id);
    let (client, transport) = super::connect(config)?;

    let session = client.session().await.context("Failed to login")?;
    let url = match transport
        .track_file_url(&session, &args.track_id, format_id)
        .await
    {
        Err(Error::Api(api)) if api.is_auth_error() => {
            warn!(error = %api, "Session rejected, logging in again");
            client.invalidate();
            let session = client.session().await.context("Failed to login")?;
            transport
                .track_file_url(&session, &args.track_id, format_id)
                .await
        }
        other => other,
    }
    .context("Failed to resolve track URL")?;

    if args.json {
        output::json(&TrackUrlOutput {
            track_id: &args.track_id,
            format_id,
            url: &url,
        })?;
    } else {
        println!("{}", url);
    }

    Ok(())
}
