//! Login lifecycle: start exactly one exchange, consume exactly one outcome.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{info, warn};

use qobuz_core::{Credentials, Error, LoginTransport, QobuzSession, Result};

use crate::client::{Inner, Shared, Waiter};

/// Issues logins through the transport with the configured credentials.
pub(crate) struct LoginDriver {
    transport: Arc<dyn LoginTransport>,
    credentials: Credentials,
}

impl LoginDriver {
    pub(crate) fn new(transport: Arc<dyn LoginTransport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub(crate) fn identifier(&self) -> &str {
        self.credentials.identifier()
    }
}

// Where a login's callback is relative to the `issue_login` call.
const ISSUING: u8 = 0;
const ISSUED: u8 = 1;
const DISARMED: u8 = 2;

/// The completion handed to the transport.
///
/// A transport that drops it without calling it (its runtime shut down, the
/// spawned task never ran) would otherwise leave the login in flight
/// forever. Dropped after `issue_login` returned, it completes the login
/// with [`Error::Shutdown`]. Dropped before, it only marks itself lost and
/// [`Shared::start_login`], which still holds the lock, reports the failure.
struct Completion {
    shared: Option<Arc<Shared>>,
    stage: Arc<AtomicU8>,
}

impl Completion {
    fn fire(mut self, result: Result<QobuzSession>) {
        if let Some(shared) = self.shared.take() {
            shared.finish_login(result);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        let Some(shared) = self.shared.take() else {
            return;
        };

        match self
            .stage
            .compare_exchange(ISSUING, DISARMED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) | Err(DISARMED) => {}
            Err(_) => {
                warn!("Login transport dropped its callback without a result");
                shared.finish_login(Err(Error::Shutdown));
            }
        }
    }
}

impl Shared {
    /// Start a login. Must be called with the lock held, no session cached
    /// and no login in flight.
    ///
    /// # Errors
    ///
    /// Returns the transport's synchronous failure, or [`Error::Shutdown`]
    /// if the transport dropped the callback before returning. The in-flight
    /// marker is cleared again in that case, but the failure is not cached.
    pub(crate) fn start_login(self: &Arc<Self>, inner: &mut Inner) -> Result<()> {
        inner.cache.begin_login();
        info!(identifier = %self.driver.identifier(), "Starting login");

        let stage = Arc::new(AtomicU8::new(ISSUING));
        let completion = Completion {
            shared: Some(Arc::clone(self)),
            stage: Arc::clone(&stage),
        };
        let started = self.driver.transport.issue_login(
            &self.driver.credentials,
            Box::new(move |result| completion.fire(result)),
        );

        let started = match started {
            Ok(()) => match stage.compare_exchange(
                ISSUING,
                ISSUED,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => Ok(()),
                Err(_) => Err(Error::Shutdown),
            },
            Err(err) => {
                // No result may arrive for a login that failed to start.
                stage.store(DISARMED, Ordering::Release);
                Err(err)
            }
        };

        if started.is_err() {
            inner.cache.abort_login();
        }
        started
    }

    /// Start a login; if it cannot even start, cache that failure and
    /// schedule a broadcast so the pending waiters hear about it.
    ///
    /// Returns the waiters that can no longer be delivered, see
    /// [`Shared::schedule_broadcast`].
    pub(crate) fn start_login_or_fail(self: &Arc<Self>, inner: &mut Inner) -> Vec<Waiter> {
        match self.start_login(inner) {
            Ok(()) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "Login could not be started");
                inner.cache.set_failure(err);
                self.schedule_broadcast(inner)
            }
        }
    }

    /// Completion of the exchange started by [`Shared::start_login`].
    fn finish_login(self: &Arc<Self>, result: Result<QobuzSession>) {
        let abandoned = {
            let mut inner = self.lock();
            if !inner.cache.login_in_flight() {
                warn!("Ignoring login result with no login in flight");
                return;
            }

            match result {
                Ok(session) => {
                    info!(user_id = ?session.user_id(), "Login succeeded");
                    inner.cache.set(session);
                }
                Err(err) => {
                    warn!(error = %err, "Login failed");
                    inner.cache.set_failure(err);
                }
            }
            self.schedule_broadcast(&mut inner)
        };
        drop(abandoned);
    }
}
