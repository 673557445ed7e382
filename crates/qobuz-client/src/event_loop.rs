//! Serialized dispatch context on top of tokio.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, trace};

use qobuz_core::{Dispatcher, Error, Job, Result, TransportError};

/// A single tokio task that runs scheduled jobs one at a time, in order.
///
/// The task ends once every `EventLoop` handle is dropped and the queue is
/// drained.
#[derive(Debug, Clone)]
pub struct EventLoop {
    tx: mpsc::UnboundedSender<Job>,
}

impl EventLoop {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails if called outside a tokio runtime.
    pub fn spawn() -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| TransportError::NoRuntime {
            message: e.to_string(),
        })?;
        Ok(Self::spawn_on(&handle))
    }

    /// Spawn the loop on the given runtime.
    pub fn spawn_on(handle: &Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run(rx));
        Self { tx }
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<Job>) {
    debug!("event loop started");

    while let Some(job) = rx.recv().await {
        trace!("running deferred job");
        // A panicking job must not take the remaining queue down with it.
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!("deferred job panicked");
        }
    }

    debug!("event loop stopped");
}

impl Dispatcher for EventLoop {
    fn schedule(&self, job: Job) -> Result<()> {
        self.tx.send(job).map_err(|_| Error::Shutdown)
    }
}
