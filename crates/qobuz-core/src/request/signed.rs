//! Plain and signed request URLs.

use std::fmt;
use std::sync::Arc;

use crate::error::InvalidInputError;
use crate::tokens::AppSecret;
use crate::traits::{Clock, Md5Digest, RequestDigest, SystemClock};
use crate::types::BaseUrl;
use crate::Result;

use super::QueryStringBuilder;

/// Builds `base/object/method?...` request URLs for one application.
///
/// Every URL carries the `app_id` parameter. Signed URLs additionally carry
/// `request_ts` and `request_sig`, where the signature is the hex digest of
///
/// ```text
/// object + method + key1 + value1 + ... + keyN + valueN + request_ts + app_secret
/// ```
///
/// in exactly that order. The API recomputes the same digest, so the
/// parameter order passed in must match the order that ends up in the URL.
#[derive(Clone)]
pub struct RequestUrlBuilder {
    base_url: BaseUrl,
    app_id: String,
    app_secret: AppSecret,
    digest: Arc<dyn RequestDigest>,
    clock: Arc<dyn Clock>,
}

impl RequestUrlBuilder {
    /// Create a builder using MD5 signatures and the system clock.
    pub fn new(base_url: BaseUrl, app_id: impl Into<String>, app_secret: AppSecret) -> Self {
        Self {
            base_url,
            app_id: app_id.into(),
            app_secret,
            digest: Arc::new(Md5Digest),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock that supplies `request_ts`.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the signature digest.
    pub fn with_digest(mut self, digest: impl RequestDigest + 'static) -> Self {
        self.digest = Arc::new(digest);
        self
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the application id.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Build an unsigned request URL.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidInputError::EmptyQuery`] if `query` is empty.
    pub fn make_url<K, V>(&self, object: &str, method: &str, query: &[(K, V)]) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        ensure_query(object, method, query)?;

        let mut url = self.base_url.endpoint(object, method);
        let mut q = QueryStringBuilder::new();
        for (key, value) in query {
            q.append(&mut url, key.as_ref(), value.as_ref());
        }

        q.append(&mut url, "app_id", &self.app_id);
        Ok(url)
    }

    /// Build a signed request URL stamped with the current time.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidInputError::EmptyQuery`] if `query` is empty.
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
        self.make_signed_url_at(object, method, query, self.clock.unix_timestamp())
    }

    /// Build a signed request URL with an explicit `request_ts`.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidInputError::EmptyQuery`] if `query` is empty.
    pub fn make_signed_url_at<K, V>(
        &self,
        object: &str,
        method: &str,
        query: &[(K, V)],
        request_ts: i64,
    ) -> Result<String>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        ensure_query(object, method, query)?;

        let mut url = self.base_url.endpoint(object, method);
        let mut q = QueryStringBuilder::new();

        let mut signed = String::with_capacity(64);
        signed.push_str(object);
        signed.push_str(method);
        for (key, value) in query {
            let (key, value) = (key.as_ref(), value.as_ref());
            q.append(&mut url, key, value);

            signed.push_str(key);
            signed.push_str(value);
        }

        q.append(&mut url, "app_id", &self.app_id);

        let request_ts = request_ts.to_string();
        q.append(&mut url, "request_ts", &request_ts);
        signed.push_str(&request_ts);

        signed.push_str(self.app_secret.as_str());

        let request_sig = self.digest.hex_digest(signed.as_bytes());
        q.append(&mut url, "request_sig", &request_sig);

        Ok(url)
    }
}

fn ensure_query<K, V>(object: &str, method: &str, query: &[(K, V)]) -> Result<()> {
    if query.is_empty() {
        return Err(InvalidInputError::EmptyQuery {
            object: object.to_string(),
            method: method.to_string(),
        }
        .into());
    }
    Ok(())
}

impl fmt::Debug for RequestUrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestUrlBuilder")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("app_secret", &self.app_secret)
            .finish_non_exhaustive()
    }
}
