//! Single-flight session manager.

use std::fmt;
use std::mem;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument, warn};

use qobuz_core::{
    Credentials, Dispatcher, Error, LoginPolicy, LoginTransport, NeverRetry, QobuzSession,
    RequestUrlBuilder, Result, SessionError,
};

use crate::config::ClientConfig;
use crate::event_loop::EventLoop;
use crate::login::LoginDriver;
use crate::state::SessionCache;
use crate::transport::HttpTransport;

/// A registered interest in the session, invoked exactly once.
pub type Waiter = Box<dyn FnOnce(std::result::Result<QobuzSession, SessionError>) + Send + 'static>;

/// Hands out one shared session to any number of concurrent callers.
///
/// Callers [`register`](Self::register) a waiter; the first registration
/// starts a login and every waiter that arrives while it runs rides on the
/// same attempt. Once the login completes, every pending waiter is invoked
/// with the outcome. Both the session and a failure are cached: later
/// registrations are answered from the cache without a new login, subject
/// to the [`LoginPolicy`] for cached failures.
///
/// Waiters are invoked one at a time on the dispatcher, never while an
/// internal lock is held, so they may call back into the client. The order
/// in which pending waiters are invoked is unspecified.
///
/// # Example
///
/// ```no_run
/// use qobuz_client::{ClientConfig, QobuzClient};
///
/// # async fn example() -> Result<(), qobuz_core::Error> {
/// let config = ClientConfig {
///     app_id: "100000000".into(),
///     app_secret: "secret".into(),
///     username: Some("alice".into()),
///     password: "hunter2".into(),
///     ..ClientConfig::default()
/// };
/// let client = QobuzClient::new(&config)?;
///
/// let session = client.session().await?;
/// let url = client.make_signed_url("track", "getFileUrl", &[("track_id", "5966783")])?;
/// # let _ = (session, url);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QobuzClient {
    shared: Arc<Shared>,
}

pub(crate) struct Shared {
    inner: Mutex<Inner>,
    pub(crate) driver: LoginDriver,
    dispatcher: Arc<dyn Dispatcher>,
    policy: Arc<dyn LoginPolicy>,
    urls: RequestUrlBuilder,
}

/// State guarded by the client's lock.
pub(crate) struct Inner {
    pub(crate) cache: SessionCache,
    waiters: Vec<Waiter>,
}

/// Assembles a [`QobuzClient`] from its collaborators.
pub struct ClientBuilder {
    urls: RequestUrlBuilder,
    credentials: Credentials,
    transport: Arc<dyn LoginTransport>,
    dispatcher: Arc<dyn Dispatcher>,
    policy: Arc<dyn LoginPolicy>,
}

impl ClientBuilder {
    /// Decide whether cached login failures may be retried. Defaults to
    /// [`NeverRetry`].
    pub fn login_policy(mut self, policy: impl LoginPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn build(self) -> QobuzClient {
        QobuzClient {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    cache: SessionCache::default(),
                    waiters: Vec::new(),
                }),
                driver: LoginDriver::new(self.transport, self.credentials),
                dispatcher: self.dispatcher,
                policy: self.policy,
                urls: self.urls,
            }),
        }
    }
}

impl QobuzClient {
    /// Create a client talking HTTP, delivering on a fresh [`EventLoop`].
    ///
    /// # Errors
    ///
    /// Fails outside a tokio runtime, or if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let transport = HttpTransport::new(config)?;
        let event_loop = EventLoop::spawn()?;

        Ok(Self::builder(config.url_builder(), config.credentials(), transport, event_loop).build())
    }

    /// Start assembling a client from explicit collaborators.
    pub fn builder(
        urls: RequestUrlBuilder,
        credentials: Credentials,
        transport: impl LoginTransport,
        dispatcher: impl Dispatcher,
    ) -> ClientBuilder {
        ClientBuilder {
            urls,
            credentials,
            transport: Arc::new(transport),
            dispatcher: Arc::new(dispatcher),
            policy: Arc::new(NeverRetry),
        }
    }

    /// Register interest in the session.
    ///
    /// Returns immediately. `waiter` is invoked exactly once, later, on the
    /// dispatcher, with the session or the reason there is none.
    pub fn register<F>(&self, waiter: F)
    where
        F: FnOnce(std::result::Result<QobuzSession, SessionError>) + Send + 'static,
    {
        self.shared.register(Box::new(waiter));
    }

    /// Wait for the session, logging in if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] if the login failed, or
    /// [`Error::Shutdown`] if the dispatcher stopped, so the waiter was
    /// dropped without being delivered.
    pub async fn session(&self) -> Result<QobuzSession> {
        let (tx, rx) = oneshot::channel();
        self.register(move |outcome| {
            let _ = tx.send(outcome);
        });

        let outcome = rx.await.map_err(|_| Error::Shutdown)?;
        Ok(outcome?)
    }

    /// The cached session, without waiting and without logging in.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoSession`] if nothing is cached yet, or the cached
    /// [`SessionError::LoginFailed`].
    pub fn get(&self) -> std::result::Result<QobuzSession, SessionError> {
        self.shared.lock().cache.get()
    }

    /// True iff a session is cached.
    pub fn is_defined(&self) -> bool {
        self.shared.lock().cache.is_defined()
    }

    /// Forget the cached session or failure, e.g. after the API rejected the
    /// token. The next registration logs in again.
    pub fn invalidate(&self) {
        info!("Invalidating cached session");
        self.shared.lock().cache.clear();
    }

    /// Returns the URL builder.
    pub fn urls(&self) -> &RequestUrlBuilder {
        &self.shared.urls
    }

    /// Build `base/object/method?query&app_id=...`.
    ///
    /// # Errors
    ///
    /// Fails if `query` is empty.
    pub fn make_url<K, V>(&self, object: &str, method: &str, query: &[(K, V)]) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.shared.urls.make_url(object, method, query)
    }

    /// Build a signed request URL stamped with the current time.
    ///
    /// # Errors
    ///
    /// Fails if `query` is empty.
    pub fn make_signed_url<K, V>(
        &self,
        object: &str,
        method: &str,
        query: &[(K, V)],
    ) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.shared.urls.make_signed_url(object, method, query)
    }
}

impl fmt::Debug for QobuzClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("QobuzClient")
            .field("identifier", &self.shared.driver.identifier())
            .field("cache", &inner.cache)
            .field("pending_waiters", &inner.waiters.len())
            .finish_non_exhaustive()
    }
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[instrument(skip_all)]
    fn register(self: &Arc<Self>, waiter: Waiter) {
        let abandoned = {
            let mut inner = self.lock();
            self.enqueue(&mut inner, waiter)
        };
        drop(abandoned);
    }

    /// Add `waiter` to the pending list and make sure a login or a queued
    /// broadcast will deliver it.
    fn enqueue(self: &Arc<Self>, inner: &mut Inner, waiter: Waiter) -> Vec<Waiter> {
        let was_empty = inner.waiters.is_empty();
        inner.waiters.push(waiter);

        if !was_empty || inner.cache.login_in_flight() {
            debug!(pending = inner.waiters.len(), "Joining pending delivery");
            return Vec::new();
        }

        if inner.cache.is_defined() {
            return self.schedule_broadcast(inner);
        }

        if let Some(failed_at) = inner.cache.failed_at() {
            if !self.policy.may_retry(failed_at) {
                debug!("Answering from cached login failure");
                return self.schedule_broadcast(inner);
            }
            info!("Retrying login after cached failure");
        }

        self.start_login_or_fail(inner)
    }

    /// Queue a broadcast on the dispatcher.
    ///
    /// If the dispatcher has stopped, no pending waiter can ever be
    /// delivered. They are taken out of the list and returned so the caller
    /// drops them after releasing the lock; a [`QobuzClient::session`] future
    /// then resolves to [`Error::Shutdown`].
    #[must_use]
    pub(crate) fn schedule_broadcast(self: &Arc<Self>, inner: &mut Inner) -> Vec<Waiter> {
        let shared = Arc::clone(self);
        match self.dispatcher.schedule(Box::new(move || shared.broadcast())) {
            Ok(()) => Vec::new(),
            Err(err) => {
                warn!(
                    error = %err,
                    pending = inner.waiters.len(),
                    "Cannot deliver session, dropping waiters"
                );
                mem::take(&mut inner.waiters)
            }
        }
    }

    /// Drain the pending waiters, invoking each with the lock released.
    fn broadcast(self: &Arc<Self>) {
        let mut inner = self.lock();
        let mut delivered = 0usize;
        let mut abandoned = Vec::new();

        loop {
            if inner.waiters.is_empty() || inner.cache.login_in_flight() {
                break;
            }

            let outcome = match inner.cache.get() {
                // Invalidated after this broadcast was scheduled
                Err(SessionError::NoSession) => {
                    abandoned.extend(self.start_login_or_fail(&mut inner));
                    continue;
                }
                outcome => outcome,
            };

            let Some(waiter) = inner.waiters.pop() else {
                break;
            };

            drop(inner);
            // A panicking waiter must not strand the ones still pending.
            if catch_unwind(AssertUnwindSafe(move || waiter(outcome))).is_err() {
                error!("Session waiter panicked");
            }
            delivered += 1;
            inner = self.lock();
        }

        debug!(delivered, pending = inner.waiters.len(), "Broadcast finished");
        drop(inner);
        drop(abandoned);
    }
}
