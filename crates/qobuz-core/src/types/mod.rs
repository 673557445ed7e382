//! Validated value types.
//!
//! These types enforce their invariants at construction time,
//! so the rest of the crate can treat them as plain data.

mod base_url;

pub use base_url::{BaseUrl, DEFAULT_BASE_URL};
