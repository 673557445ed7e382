//! Login credentials type.

use std::fmt;

use crate::error::InvalidInputError;

/// Login credentials for the `user/login` exchange.
///
/// The API accepts either a username or an email address (or both) together
/// with the account password. The device manufacturer id identifies the
/// installation and is sent along with every login.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use qobuz_core::Credentials;
///
/// let creds = Credentials::with_username("alice", "hunter2")
///     .device_manufacturer_id("00000000-0000-0000-0000-000000000000");
/// assert_eq!(creds.identifier(), "alice");
/// ```
#[derive(Clone, Default)]
pub struct Credentials {
    username: Option<String>,
    email: Option<String>,
    password: String,
    device_manufacturer_id: Option<String>,
}

impl Credentials {
    /// Credentials identified by username.
    pub fn with_username(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Credentials identified by email address.
    pub fn with_email(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Build credentials from optional parts, as read from configuration.
    pub fn from_parts(
        username: Option<String>,
        email: Option<String>,
        password: impl Into<String>,
        device_manufacturer_id: Option<String>,
    ) -> Self {
        Self {
            username,
            email,
            password: password.into(),
            device_manufacturer_id,
        }
    }

    /// Set the device manufacturer id.
    pub fn device_manufacturer_id(mut self, id: impl Into<String>) -> Self {
        self.device_manufacturer_id = Some(id.into());
        self
    }

    /// Returns the username, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the email address, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the device manufacturer id, if any.
    pub fn device_id(&self) -> Option<&str> {
        self.device_manufacturer_id.as_deref()
    }

    /// Returns a printable identifier: the username, else the email.
    pub fn identifier(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("")
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing login requests.
    /// Never log or display this value.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Check that these credentials can be sent to the login endpoint.
    ///
    /// # Errors
    ///
    /// Fails if neither username nor email is set, or the password is empty.
    pub fn validate(&self) -> Result<(), InvalidInputError> {
        let has_identifier = [&self.username, &self.email]
            .into_iter()
            .any(|v| v.as_deref().is_some_and(|s| !s.is_empty()));

        if !has_identifier {
            return Err(InvalidInputError::Credentials {
                reason: "username or email is required".to_string(),
            });
        }

        if self.password.is_empty() {
            return Err(InvalidInputError::Credentials {
                reason: "password is required".to_string(),
            });
        }

        Ok(())
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("device_manufacturer_id", &self.device_manufacturer_id)
            .finish()
    }
}
