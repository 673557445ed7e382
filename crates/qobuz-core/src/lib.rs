//! qobuz-core - Core types and traits for the Qobuz session toolkit.
//!
//! This crate holds everything that does not need a runtime or an HTTP
//! client: the session value, credentials, the error taxonomy, the
//! collaborator traits the session manager is written against, and the
//! (signed) request URL builders.

pub mod credentials;
pub mod error;
pub mod request;
pub mod session;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::{ApiError, Error, InvalidInputError, SessionError, TransportError};
pub use request::{QueryStringBuilder, RequestUrlBuilder};
pub use session::QobuzSession;
pub use tokens::{AppSecret, UserAuthToken};
pub use traits::{
    Clock, Dispatcher, FixedClock, Job, LoginCallback, LoginPolicy, LoginTransport, Md5Digest,
    NeverRetry, RequestDigest, RetryAfter, SystemClock,
};
pub use types::BaseUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
