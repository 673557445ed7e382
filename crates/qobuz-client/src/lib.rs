//! qobuz-client - Session management and HTTP transport for the Qobuz API.
//!
//! [`QobuzClient`] makes sure at most one login is in flight, caches the
//! resulting session (or failure), and notifies every interested caller
//! exactly once. [`HttpTransport`] performs the actual HTTP exchanges and
//! [`EventLoop`] is the serialized context notifications are delivered on.

mod client;
mod config;
mod endpoints;
mod event_loop;
mod login;
mod state;
mod transport;

pub use client::{ClientBuilder, QobuzClient, Waiter};
pub use config::{ClientConfig, DEFAULT_FORMAT_ID, HttpTimeouts};
pub use event_loop::EventLoop;
pub use transport::HttpTransport;
