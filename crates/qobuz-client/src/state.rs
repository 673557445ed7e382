//! The cached outcome of the last login.

use std::sync::Arc;
use std::time::Instant;

use qobuz_core::{Error, QobuzSession, SessionError};

/// What the last login produced.
#[derive(Debug, Default)]
enum Outcome {
    #[default]
    Empty,
    Ready(QobuzSession),
    Failed {
        error: SessionError,
        at: Instant,
    },
}

/// Session cache plus the in-flight login marker.
///
/// Lives behind the client's mutex; every method assumes the caller holds it.
#[derive(Debug, Default)]
pub(crate) struct SessionCache {
    outcome: Outcome,
    login_in_flight: bool,
}

impl SessionCache {
    /// True iff a session is cached.
    pub(crate) fn is_defined(&self) -> bool {
        matches!(self.outcome, Outcome::Ready(_))
    }

    /// The cached session, or why there is none.
    pub(crate) fn get(&self) -> Result<QobuzSession, SessionError> {
        match &self.outcome {
            Outcome::Ready(session) => Ok(session.clone()),
            Outcome::Failed { error, .. } => Err(error.clone()),
            Outcome::Empty => Err(SessionError::NoSession),
        }
    }

    /// When the cached failure was recorded, if a failure is cached.
    pub(crate) fn failed_at(&self) -> Option<Instant> {
        match self.outcome {
            Outcome::Failed { at, .. } => Some(at),
            _ => None,
        }
    }

    pub(crate) fn login_in_flight(&self) -> bool {
        self.login_in_flight
    }

    /// Mark a login as started. A stale failure stops being reported.
    pub(crate) fn begin_login(&mut self) {
        debug_assert!(!self.login_in_flight, "login already in flight");
        debug_assert!(!self.is_defined(), "login started with a session cached");

        self.outcome = Outcome::Empty;
        self.login_in_flight = true;
    }

    /// Undo [`SessionCache::begin_login`] for a login that never started.
    pub(crate) fn abort_login(&mut self) {
        self.login_in_flight = false;
    }

    pub(crate) fn set(&mut self, session: QobuzSession) {
        self.outcome = Outcome::Ready(session);
        self.login_in_flight = false;
    }

    pub(crate) fn set_failure(&mut self, error: Error) {
        self.outcome = Outcome::Failed {
            error: SessionError::LoginFailed(Arc::new(error)),
            at: Instant::now(),
        };
        self.login_in_flight = false;
    }

    /// Forget the cached session or failure. An in-flight login is unaffected.
    pub(crate) fn clear(&mut self) {
        self.outcome = Outcome::Empty;
    }
}
