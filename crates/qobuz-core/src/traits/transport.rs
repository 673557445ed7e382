//! Login transport trait.

use crate::{Credentials, QobuzSession, Result};

/// Completion callback for one login exchange.
pub type LoginCallback = Box<dyn FnOnce(Result<QobuzSession>) + Send + 'static>;

/// Something that can perform the `user/login` exchange.
pub trait LoginTransport: Send + Sync + 'static {
    /// Start one asynchronous login.
    ///
    /// On `Ok(())` the callback is invoked exactly once with the outcome,
    /// and never before `issue_login` has returned. On `Err` the request
    /// never started and the callback is dropped without being called.
    fn issue_login(&self, credentials: &Credentials, on_complete: LoginCallback) -> Result<()>;
}
