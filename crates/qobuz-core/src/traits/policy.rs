//! Retry policy after a failed login.

use std::time::{Duration, Instant};

/// Decides whether a new waiter may trigger a fresh login while the
/// previous attempt's failure is still cached.
pub trait LoginPolicy: Send + Sync {
    /// `failed_at` is when the cached failure was recorded.
    fn may_retry(&self, failed_at: Instant) -> bool;
}

/// Keep surfacing the cached failure until the cache is invalidated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRetry;

impl LoginPolicy for NeverRetry {
    fn may_retry(&self, _failed_at: Instant) -> bool {
        false
    }
}

/// Allow a new login once the cached failure is at least this old.
#[derive(Debug, Clone, Copy)]
pub struct RetryAfter(pub Duration);

impl LoginPolicy for RetryAfter {
    fn may_retry(&self, failed_at: Instant) -> bool {
        failed_at.elapsed() >= self.0
    }
}
