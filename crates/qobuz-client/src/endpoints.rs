//! API endpoint definitions and response types.

use serde::Deserialize;

// ============================================================================
// Endpoint Names
// ============================================================================

/// `user/login`
pub const USER_OBJECT: &str = "user";
pub const LOGIN_METHOD: &str = "login";

/// `track/getFileUrl`
pub const TRACK_OBJECT: &str = "track";
pub const GET_FILE_URL_METHOD: &str = "getFileUrl";

/// Header carrying the application id on login.
pub const APP_ID_HEADER: &str = "x-app-id";

/// Header carrying the session token on authenticated requests.
pub const USER_AUTH_TOKEN_HEADER: &str = "x-user-auth-token";

// ============================================================================
// Response Types
// ============================================================================

/// Response from `user/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user_auth_token: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

/// The account part of a login response; only the id is kept.
#[derive(Debug, Deserialize)]
pub struct LoginUser {
    pub id: i64,
}

/// Response from `track/getFileUrl`.
#[derive(Debug, Deserialize)]
pub struct FileUrlResponse {
    pub url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Error body, e.g. `{"status":"error","code":401,"message":"..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}
