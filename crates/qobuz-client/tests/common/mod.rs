//! Scripted collaborators for driving the session manager by hand.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use qobuz_client::QobuzClient;
use qobuz_core::{
    AppSecret, BaseUrl, Credentials, Dispatcher, Error, FixedClock, Job, LoginCallback,
    LoginTransport, QobuzSession, RequestUrlBuilder, Result, TransportError, UserAuthToken,
};

/// A transport that parks login callbacks until the test completes them.
#[derive(Clone, Default)]
pub struct ManualTransport {
    calls: Arc<AtomicUsize>,
    pending: Arc<Mutex<Vec<LoginCallback>>>,
    refuse: Arc<AtomicBool>,
    lose: Arc<AtomicBool>,
}

impl ManualTransport {
    /// Number of `issue_login` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of logins started and not yet completed.
    pub fn in_flight(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Make subsequent `issue_login` calls fail synchronously.
    pub fn refuse_logins(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Make subsequent `issue_login` calls drop the callback before returning
    /// `Ok`.
    pub fn lose_callbacks(&self, lose: bool) {
        self.lose.store(lose, Ordering::SeqCst);
    }

    /// Drop the oldest in-flight callback without calling it, as a transport
    /// whose runtime went away would.
    pub fn abandon(&self) {
        let callback = {
            let mut pending = self.pending.lock().unwrap();
            assert!(!pending.is_empty(), "no login in flight");
            pending.remove(0)
        };
        drop(callback);
    }

    /// Complete the oldest in-flight login with `result`.
    pub fn complete(&self, result: Result<QobuzSession>) {
        let callback = {
            let mut pending = self.pending.lock().unwrap();
            assert!(!pending.is_empty(), "no login in flight");
            pending.remove(0)
        };
        callback(result);
    }
}

impl LoginTransport for ManualTransport {
    fn issue_login(&self, _credentials: &Credentials, on_complete: LoginCallback) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) {
            return Err(TransportError::Connection {
                message: "connection refused".to_string(),
            }
            .into());
        }
        if self.lose.load(Ordering::SeqCst) {
            drop(on_complete);
            return Ok(());
        }
        self.pending.lock().unwrap().push(on_complete);
        Ok(())
    }
}

/// A dispatcher whose queue the test drains explicitly.
#[derive(Clone, Default)]
pub struct QueueDispatcher {
    jobs: Arc<Mutex<VecDeque<Job>>>,
    stopped: Arc<AtomicBool>,
}

impl QueueDispatcher {
    /// Refuse all further jobs and discard the queued ones.
    pub fn shut_down(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let discarded: Vec<Job> = self.jobs.lock().unwrap().drain(..).collect();
        drop(discarded);
    }

    pub fn queued(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Run jobs until the queue is empty, including jobs scheduled by jobs.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let job = self.jobs.lock().unwrap().pop_front();
            match job {
                Some(job) => {
                    job();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Dispatcher for QueueDispatcher {
    fn schedule(&self, job: Job) -> Result<()> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(Error::Shutdown);
        }
        self.jobs.lock().unwrap().push_back(job);
        Ok(())
    }
}

pub fn urls() -> RequestUrlBuilder {
    RequestUrlBuilder::new(BaseUrl::default(), "A1", AppSecret::new("S1"))
        .with_clock(FixedClock(1_700_000_000))
}

pub fn credentials() -> Credentials {
    Credentials::with_username("alice", "secret123").device_manufacturer_id("device-1")
}

pub fn session(token: &str) -> QobuzSession {
    QobuzSession::new(UserAuthToken::new(token))
}

pub fn login_error() -> Error {
    Error::Api(qobuz_core::ApiError::new(
        401,
        Some(401),
        Some("Invalid username/email and password combination.".to_string()),
    ))
}

/// A client wired to scripted collaborators.
pub fn manual_client() -> (QobuzClient, ManualTransport, QueueDispatcher) {
    let transport = ManualTransport::default();
    let dispatcher = QueueDispatcher::default();
    let client =
        QobuzClient::builder(urls(), credentials(), transport.clone(), dispatcher.clone()).build();
    (client, transport, dispatcher)
}
