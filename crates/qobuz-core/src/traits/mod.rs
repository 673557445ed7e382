//! Collaborator traits the session manager is written against.
//!
//! The manager never talks to HTTP, a runtime, or a hash function directly;
//! it goes through these seams so each can be swapped or scripted in tests.

mod clock;
mod digest;
mod dispatcher;
mod policy;
mod transport;

pub use clock::{Clock, FixedClock, SystemClock};
pub use digest::{Md5Digest, RequestDigest};
pub use dispatcher::{Dispatcher, Job};
pub use policy::{LoginPolicy, NeverRetry, RetryAfter};
pub use transport::{LoginCallback, LoginTransport};
