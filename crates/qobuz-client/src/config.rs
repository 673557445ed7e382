//! Client configuration.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use qobuz_core::{AppSecret, BaseUrl, Credentials, InvalidInputError, RequestUrlBuilder};

/// Audio format requested from `track/getFileUrl` unless configured otherwise
/// (5 = MP3 320 kbit/s).
pub const DEFAULT_FORMAT_ID: &str = "5";

/// HTTP client timeouts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpTimeouts {
    /// Connect timeout in seconds.
    pub connect_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl HttpTimeouts {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: 15,
            request_secs: 30,
        }
    }
}

/// Everything needed to talk to the API on behalf of one account.
///
/// Deserializes from a JSON object whose keys match the field names; every
/// key is optional and falls back to [`ClientConfig::default`].
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API base URL.
    pub base_url: BaseUrl,
    /// Application id, sent with every request.
    pub app_id: String,
    /// Application secret, used for request signatures.
    pub app_secret: String,
    /// Account username (either this or `email` is required).
    pub username: Option<String>,
    /// Account email address.
    pub email: Option<String>,
    /// Account password.
    pub password: String,
    /// Device manufacturer id sent with the login.
    pub device_manufacturer_id: Option<String>,
    /// Audio format for track URLs.
    pub format_id: String,
    /// HTTP client timeouts.
    pub http_timeouts: HttpTimeouts,
    /// Custom user agent (optional).
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Returns the login credentials.
    pub fn credentials(&self) -> Credentials {
        Credentials::from_parts(
            self.username.clone(),
            self.email.clone(),
            self.password.clone(),
            self.device_manufacturer_id.clone(),
        )
    }

    /// Returns a URL builder for this application.
    pub fn url_builder(&self) -> RequestUrlBuilder {
        RequestUrlBuilder::new(
            self.base_url.clone(),
            self.app_id.clone(),
            AppSecret::new(self.app_secret.clone()),
        )
    }

    /// Check the fields needed to build request URLs.
    ///
    /// Credentials are checked separately, at login time.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        if self.app_id.is_empty() {
            return Err(InvalidInputError::Other {
                message: "app_id is required".to_string(),
            });
        }
        if self.app_secret.is_empty() {
            return Err(InvalidInputError::Other {
                message: "app_secret is required".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BaseUrl::default(),
            app_id: String::new(),
            app_secret: String::new(),
            username: None,
            email: None,
            password: String::new(),
            device_manufacturer_id: None,
            format_id: DEFAULT_FORMAT_ID.to_string(),
            http_timeouts: HttpTimeouts::default(),
            user_agent: None,
        }
    }
}

// Intentionally hide secrets in Debug output
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("device_manufacturer_id", &self.device_manufacturer_id)
            .field("format_id", &self.format_id)
            .field("http_timeouts", &self.http_timeouts)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
