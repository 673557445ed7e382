//! HTTP transport for the API.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tracing::{debug, instrument, trace};

use qobuz_core::{
    ApiError, Credentials, Error, InvalidInputError, LoginCallback, LoginTransport, QobuzSession,
    RequestUrlBuilder, Result, TransportError, UserAuthToken,
};

use crate::config::ClientConfig;
use crate::endpoints::*;

/// HTTP client for API requests.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    urls: RequestUrlBuilder,
    runtime: Option<Handle>,
}

impl HttpTransport {
    /// Create a transport from the client configuration.
    ///
    /// If called from within a tokio runtime, logins issued through
    /// [`LoginTransport`] run on that runtime even when started from a
    /// plain thread.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| concat!("qobuz-client/", env!("CARGO_PKG_VERSION")).to_string());

        let client = reqwest::Client::builder()
            .connect_timeout(config.http_timeouts.connect())
            .timeout(config.http_timeouts.request())
            .user_agent(user_agent)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            urls: config.url_builder(),
            runtime: Handle::try_current().ok(),
        })
    }

    /// Returns the URL builder requests are signed with.
    pub fn urls(&self) -> &RequestUrlBuilder {
        &self.urls
    }

    /// Perform the `user/login` exchange.
    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<QobuzSession> {
        credentials.validate()?;

        let url = self.urls.base_url().endpoint(USER_OBJECT, LOGIN_METHOD);
        let mut params = Vec::with_capacity(3);
        match (credentials.username(), credentials.email()) {
            (Some(username), _) if !username.is_empty() => params.push(("username", username)),
            (_, Some(email)) => params.push(("email", email)),
            _ => {}
        }
        params.push(("password", credentials.password()));
        if let Some(device_id) = credentials.device_id() {
            params.push(("device_manufacturer_id", device_id));
        }

        debug!(%url, "Logging in");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header(APP_ID_HEADER, self.urls.app_id())
            .send()
            .await
            .map_err(transport_error)?;

        let body: LoginResponse = self.handle_response(response).await?;
        if body.user_auth_token.is_empty() {
            return Err(TransportError::Decode {
                message: "login response carries an empty user_auth_token".to_string(),
            }
            .into());
        }

        let mut session = QobuzSession::new(UserAuthToken::new(body.user_auth_token));
        if let Some(user) = body.user {
            session = session.with_user_id(user.id);
        }

        debug!(user_id = ?session.user_id(), "Login succeeded");
        Ok(session)
    }

    /// Resolve the streaming URL of a track through a signed
    /// `track/getFileUrl` request.
    #[instrument(skip(self, session))]
    pub async fn track_file_url(
        &self,
        session: &QobuzSession,
        track_id: &str,
        format_id: &str,
    ) -> Result<String> {
        if !session.is_defined() {
            return Err(InvalidInputError::Other {
                message: "cannot request a track URL without a session".to_string(),
            }
            .into());
        }

        let url = self.urls.make_signed_url(
            TRACK_OBJECT,
            GET_FILE_URL_METHOD,
            &[
                ("track_id", track_id),
                ("format_id", format_id),
                ("intent", "stream"),
            ],
        )?;
        debug!("Requesting track file URL");

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers(session)?)
            .send()
            .await
            .map_err(transport_error)?;

        let body: FileUrlResponse = self.handle_response(response).await?;
        trace!(mime_type = ?body.mime_type, "track file URL resolved");
        Ok(body.url)
    }

    /// Create authorization headers for authenticated requests.
    fn auth_headers(&self, session: &QobuzSession) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(session.user_auth_token().as_str()).map_err(|_| {
            InvalidInputError::Other {
                message: "user auth token is not a valid header value".to_string(),
            }
        })?;
        headers.insert(USER_AUTH_TOKEN_HEADER, value);
        Ok(headers)
    }

    /// Handle a response, parsing the body or error.
    async fn handle_response<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "API response");

        if status.is_success() {
            let body = response.json::<R>().await.map_err(transport_error)?;
            Ok(body)
        } else {
            Err(Error::Api(self.parse_error_response(response).await))
        }
    }

    /// Parse an API error response.
    async fn parse_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error_body) => ApiError::new(status, error_body.code, error_body.message),
            Err(_) => ApiError::new(status, None, None),
        }
    }
}

impl LoginTransport for HttpTransport {
    fn issue_login(&self, credentials: &Credentials, on_complete: LoginCallback) -> Result<()> {
        credentials.validate()?;

        let runtime = match &self.runtime {
            Some(handle) => handle.clone(),
            None => Handle::try_current().map_err(|e| TransportError::NoRuntime {
                message: e.to_string(),
            })?,
        };

        let transport = self.clone();
        let credentials = credentials.clone();
        runtime.spawn(async move {
            let result = transport.login(&credentials).await;
            on_complete(result);
        });

        Ok(())
    }
}

/// Classify a reqwest failure.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_creation_outside_runtime() {
        let config = ClientConfig {
            app_id: "A1".into(),
            app_secret: "S1".into(),
            ..ClientConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.urls().app_id(), "A1");
        assert!(transport.runtime.is_none());
    }

    #[test]
    fn issue_login_without_runtime_fails_synchronously() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let result = transport.issue_login(
            &Credentials::with_username("alice", "pw"),
            Box::new(|_: Result<QobuzSession>| panic!("callback must not run")),
        );
        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::NoRuntime { .. }))
        ));
    }

    #[test]
    fn issue_login_rejects_incomplete_credentials() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        let result = transport.issue_login(
            &Credentials::from_parts(None, None, "pw", None),
            Box::new(|_: Result<QobuzSession>| panic!("callback must not run")),
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
