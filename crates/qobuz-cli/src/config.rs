//! Loading the client configuration from disk, environment and flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use qobuz_client::ClientConfig;

use crate::cli::SettingsArgs;

/// Default config file location.
fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "qobuz").map(|dirs| dirs.config_dir().join("config.json"))
}

/// Read a JSON config file. Unknown keys are ignored, missing ones default.
fn read_config(path: &Path) -> Result<ClientConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

/// Build the effective configuration.
///
/// An explicit `--config` file must exist; the default location is optional.
/// Flags and `QOBUZ_*` variables override the file.
pub fn load(settings: &SettingsArgs) -> Result<ClientConfig> {
    let mut config = match &settings.config {
        Some(path) => read_config(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Using default config file");
                read_config(&path)?
            }
            _ => ClientConfig::default(),
        },
    };

    apply_overrides(&mut config, settings)?;
    Ok(config)
}

fn apply_overrides(config: &mut ClientConfig, settings: &SettingsArgs) -> Result<()> {
    if let Some(base_url) = &settings.base_url {
        config.base_url = base_url.parse().context("Invalid base URL")?;
    }
    if let Some(app_id) = &settings.app_id {
        config.app_id = app_id.clone();
    }
    if let Some(app_secret) = &settings.app_secret {
        config.app_secret = app_secret.clone();
    }
    if let Some(username) = &settings.username {
        config.username = Some(username.clone());
    }
    if let Some(email) = &settings.email {
        config.email = Some(email.clone());
    }
    if let Some(password) = &settings.password {
        config.password = password.clone();
    }
    if let Some(device_id) = &settings.device_id {
        config.device_manufacturer_id = Some(device_id.clone());
    }
    Ok(())
}
