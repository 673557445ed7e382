//! Error types for the qobuz toolkit.
//!
//! [`Error`] is the unified error with explicit variants for transport,
//! API, session and input validation failures. [`SessionError`] is the
//! cloneable value handed to session waiters; a failed login is kept in it
//! verbatim so the same failure can be surfaced any number of times.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// The unified error type for qobuz operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The API answered with a non-success status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// No usable session (none yet, or the last login failed).
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// The event loop that delivers session notifications has stopped.
    #[error("event loop is shut down")]
    Shutdown,
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// No async runtime was available to run the request on.
    #[error("no async runtime available: {message}")]
    NoRuntime { message: String },
}

/// An error reported by the API in its response body.
///
/// The API answers failures with `{"status":"error","code":401,"message":"..."}`;
/// both fields are optional since proxies may answer with something else.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// API error code, if present in the body.
    pub code: Option<i64>,
    /// Error message from the server.
    pub message: Option<String>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, code: Option<i64>, message: Option<String>) -> Self {
        Self {
            status,
            code,
            message,
        }
    }

    /// Check if the API rejected our credentials or token.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.code == Some(401)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Why no session could be handed out.
///
/// This is what non-blocking session accessors return and what waiters
/// receive. It is cheap to clone; the captured login failure is shared.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// No login has completed yet.
    #[error("no session")]
    NoSession,

    /// The last login attempt failed; carries the original error.
    #[error("login failed: {0}")]
    LoginFailed(Arc<Error>),
}

impl SessionError {
    /// Returns the captured login failure, if any.
    pub fn login_error(&self) -> Option<&Error> {
        match self {
            SessionError::NoSession => None,
            SessionError::LoginFailed(err) => Some(err),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// A request URL was built without any query parameter.
    #[error("request {object}/{method} needs at least one query parameter")]
    EmptyQuery { object: String, method: String },

    /// Invalid API base URL.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Credentials cannot be used for a login.
    #[error("invalid credentials: {reason}")]
    Credentials { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
