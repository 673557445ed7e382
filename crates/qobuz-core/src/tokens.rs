//! Secret string types.

use std::fmt;

/// The user authentication token returned by `user/login`.
///
/// Sent as the `X-User-Auth-Token` header on authenticated requests.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserAuthToken(String);

impl UserAuthToken {
    /// Create a new user auth token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in request headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP request headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this token holds no value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Hide token value in Debug output
impl fmt::Debug for UserAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserAuthToken").field(&"[REDACTED]").finish()
    }
}

/// The application secret used to sign requests.
///
/// It only ever enters the signing buffer, never a URL.
#[derive(Clone)]
pub struct AppSecret(String);

impl AppSecret {
    /// Create a new application secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the secret value for use in request signatures.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AppSecret").field(&"[REDACTED]").finish()
    }
}
