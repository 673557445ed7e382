//! Deferred execution trait.

use crate::Result;

/// A unit of deferred work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single serialized execution context.
///
/// Jobs run one at a time, in the order they were scheduled, never on the
/// scheduling thread's stack.
pub trait Dispatcher: Send + Sync + 'static {
    /// Queue `job` to run once, later.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shutdown`](crate::Error::Shutdown) if the context has
    /// stopped; the job is dropped.
    fn schedule(&self, job: Job) -> Result<()>;
}
