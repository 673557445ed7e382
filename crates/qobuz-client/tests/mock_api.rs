//! Mock API tests for the HTTP transport and the client built on it.
//!
//! These tests use wiremock to stand in for the API, so they run without
//! network access or real credentials.

use std::time::Duration;

use qobuz_client::{ClientConfig, EventLoop, HttpTransport, QobuzClient};
use qobuz_core::{
    BaseUrl, Credentials, Error, Md5Digest, QobuzSession, RequestDigest, SessionError,
    UserAuthToken,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PATH: &str = "/api.json/0.2/user/login";
const FILE_URL_PATH: &str = "/api.json/0.2/track/getFileUrl";

fn mock_base_url(server: &MockServer) -> BaseUrl {
    format!("{}/api.json/0.2/", server.uri()).parse().unwrap()
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: mock_base_url(server),
        app_id: "100000000".into(),
        app_secret: "S1".into(),
        username: Some("alice".into()),
        password: "secret123".into(),
        device_manufacturer_id: Some("device-1".into()),
        ..ClientConfig::default()
    }
}

fn login_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "user": { "id": 1234, "login": "alice" },
        "user_auth_token": "test-auth-token"
    }))
}

fn login_rejected() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "status": "error",
        "code": 401,
        "message": "Invalid username/email and password combination."
    }))
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .and(query_param("username", "alice"))
        .and(query_param("password", "secret123"))
        .and(query_param("device_manufacturer_id", "device-1"))
        .and(header("x-app-id", "100000000"))
        .respond_with(login_ok())
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config(&server)).unwrap();
    let credentials =
        Credentials::with_username("alice", "secret123").device_manufacturer_id("device-1");
    let session = transport.login(&credentials).await.unwrap();

    assert_eq!(session.user_auth_token().as_str(), "test-auth-token");
    assert_eq!(session.user_id(), Some(1234));
}

#[tokio::test]
async fn test_login_with_email() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .and(query_param("email", "alice@example.com"))
        .respond_with(login_ok())
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config(&server)).unwrap();
    let session = transport
        .login(&Credentials::with_email("alice@example.com", "secret123"))
        .await
        .unwrap();

    assert!(session.is_defined());
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(login_rejected())
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config(&server)).unwrap();
    let err = transport
        .login(&Credentials::with_username("alice", "wrong"))
        .await
        .unwrap_err();

    match err {
        Error::Api(api) => {
            assert!(api.is_auth_error());
            assert_eq!(api.code, Some(401));
            assert!(api.to_string().contains("401"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_error_without_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config(&server)).unwrap();
    let err = transport
        .login(&Credentials::with_username("alice", "secret123"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api(ref api) if api.status == 503 && api.code.is_none()));
}

#[tokio::test]
async fn test_login_empty_token_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user_auth_token": "" })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config(&server)).unwrap();
    let result = transport
        .login(&Credentials::with_username("alice", "secret123"))
        .await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_track_file_url_is_signed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FILE_URL_PATH))
        .and(query_param("track_id", "5966783"))
        .and(query_param("format_id", "5"))
        .and(query_param("intent", "stream"))
        .and(query_param("app_id", "100000000"))
        .and(header("x-user-auth-token", "test-auth-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://streaming.example/track.mp3",
            "mime_type": "audio/mpeg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config(&server)).unwrap();
    let session = QobuzSession::new(UserAuthToken::new("test-auth-token"));
    let url = transport
        .track_file_url(&session, "5966783", "5")
        .await
        .unwrap();
    assert_eq!(url, "https://streaming.example/track.mp3");

    let requests = server.received_requests().await.unwrap();
    let query: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let lookup = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap()
    };

    let ts = lookup("request_ts");
    let expected =
        Md5Digest.hex_digest(format!("trackgetFileUrltrack_id5966783format_id5intentstream{}S1", ts).as_bytes());
    assert_eq!(lookup("request_sig"), expected);
    assert!(query.iter().all(|(_, v)| v != "S1"));
}

#[tokio::test]
async fn test_track_file_url_requires_session() {
    let server = MockServer::start().await;
    let transport = HttpTransport::new(&config(&server)).unwrap();

    let result = transport
        .track_file_url(&QobuzSession::default(), "1", "5")
        .await;
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Client over HTTP
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_sessions_share_one_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(login_ok().set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;

    let client = QobuzClient::new(&config(&server)).unwrap();

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.session().await })
        })
        .collect();

    for task in tasks {
        let session = task.await.unwrap().unwrap();
        assert_eq!(session.user_auth_token().as_str(), "test-auth-token");
    }
    assert!(client.is_defined());
    assert_eq!(client.get().unwrap().user_id(), Some(1234));
}

#[tokio::test]
async fn test_rejected_login_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(login_rejected())
        .expect(1)
        .mount(&server)
        .await;

    let client = QobuzClient::new(&config(&server)).unwrap();

    for _ in 0..2 {
        match client.session().await {
            Err(Error::Session(SessionError::LoginFailed(err))) => {
                assert!(matches!(&*err, Error::Api(api) if api.is_auth_error()));
            }
            other => panic!("expected login failure, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_invalidate_logs_in_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(login_ok())
        .expect(2)
        .mount(&server)
        .await;

    let client = QobuzClient::new(&config(&server)).unwrap();

    client.session().await.unwrap();
    client.session().await.unwrap();
    client.invalidate();
    client.session().await.unwrap();
}

#[tokio::test]
async fn test_client_urls_use_configured_base() {
    let server = MockServer::start().await;
    let client = QobuzClient::new(&config(&server)).unwrap();

    let url = client
        .make_url("track", "get", &[("track_id", "123")])
        .unwrap();
    assert_eq!(
        url,
        format!("{}/api.json/0.2/track/get?track_id=123&app_id=100000000", server.uri())
    );
}

#[test]
fn test_transport_on_dropped_runtime_fails_the_login() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:9/api.json/0.2/".parse().unwrap(),
        app_id: "100000000".into(),
        app_secret: "S1".into(),
        username: Some("alice".into()),
        password: "secret123".into(),
        ..ClientConfig::default()
    };

    let stale = tokio::runtime::Runtime::new().unwrap();
    let transport = stale.block_on(async { HttpTransport::new(&config) }).unwrap();
    drop(stale);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let client = QobuzClient::builder(
            config.url_builder(),
            config.credentials(),
            transport,
            EventLoop::spawn().unwrap(),
        )
        .build();

        let result = tokio::time::timeout(Duration::from_secs(5), client.session())
            .await
            .expect("session() never resolved");
        match result {
            Err(Error::Session(SessionError::LoginFailed(err))) => {
                assert!(matches!(*err, Error::Shutdown));
            }
            other => panic!("expected login failure, got {:?}", other),
        }
    });
}
