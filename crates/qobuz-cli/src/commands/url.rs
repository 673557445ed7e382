//! URL command implementation.

use anyhow::{Context, Result};
use clap::Args;

use qobuz_client::ClientConfig;
use qobuz_core::InvalidInputError;

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// API object, e.g. "track"
    pub object: String,

    /// API method, e.g. "getFileUrl"
    pub method: String,

    /// Query parameters as key=value, in request order
    #[arg(value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Add request_ts and request_sig
    #[arg(long)]
    pub signed: bool,

    /// Unix timestamp to sign with instead of the current time
    #[arg(long, requires = "signed")]
    pub timestamp: Option<i64>,
}

/// Split `key=value` at the first `=`.
fn parse_param(s: &str) -> Result<(String, String), InvalidInputError> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(InvalidInputError::Other {
            message: format!("expected key=value, got {:?}", s),
        }),
    }
}

pub fn run(args: UrlArgs, config: &ClientConfig) -> Result<()> {
    config.validate().context("Incomplete configuration")?;
    let urls = config.url_builder();

    let url = match (args.signed, args.timestamp) {
        (true, Some(ts)) => urls.make_signed_url_at(&args.object, &args.method, &args.params, ts),
        (true, None) => urls.make_signed_url(&args.object, &args.method, &args.params),
        (false, _) => urls.make_url(&args.object, &args.method, &args.params),
    }
    .context("Failed to build URL")?;

    println!("{}", url);
    Ok(())
}
