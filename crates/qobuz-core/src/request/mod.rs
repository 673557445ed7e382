//! Request URL construction.
//!
//! Query strings are assembled by plain concatenation: values are appended
//! as given, without percent-encoding, because the signature is computed
//! over the raw values.

mod query;
mod signed;

pub use query::QueryStringBuilder;
pub use signed::RequestUrlBuilder;
