//! The session value produced by a successful login.

use crate::tokens::UserAuthToken;

/// An authenticated Qobuz session.
///
/// Holds the user auth token and the account metadata the API returned with
/// it. Sessions are immutable and cheap to clone; hand copies to whichever
/// request needs one.
///
/// `QobuzSession::default()` is the undefined session. It never compares
/// equal to a session obtained from a login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QobuzSession {
    user_auth_token: UserAuthToken,
    user_id: Option<i64>,
}

impl QobuzSession {
    /// Create a session from a login response.
    pub fn new(user_auth_token: UserAuthToken) -> Self {
        Self {
            user_auth_token,
            user_id: None,
        }
    }

    /// Attach the numeric user id the API reported.
    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// True unless this is the undefined session.
    pub fn is_defined(&self) -> bool {
        !self.user_auth_token.is_empty()
    }

    /// Returns the user auth token.
    pub fn user_auth_token(&self) -> &UserAuthToken {
        &self.user_auth_token
    }

    /// Returns the user id, if the API reported one.
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }
}
