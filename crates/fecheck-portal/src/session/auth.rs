//! Login contracts and success-signal detection.

use serde_json::Value;

/// Ordered key paths where known backends put the bearer token.
const TOKEN_PATHS: &[&[&str]] = &[
    &["token"],
    &["access_token"],
    &["accessToken"],
    &["data", "token"],
    &["data", "access_token"],
    &["data", "accessToken"],
    &["tokens", "access", "token"],
];

/// How the credential pair is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginEncoding {
    Json,
    Form,
}

/// One way of submitting credentials to a venue.
#[derive(Debug, Clone)]
pub struct LoginContract {
    /// Login path relative to the venue base URL.
    pub path: String,
    pub identifier_field: String,
    pub secret_field: String,
    pub encoding: LoginEncoding,
    /// GET the base URL first so the server can set its initial cookies.
    pub warm_up: bool,
    /// Text that only appears on the post-login landing page.
    pub landing_marker: Option<String>,
}

impl LoginContract {
    #[must_use]
    pub fn json(path: &str) -> Self {
        Self {
            path: path.to_string(),
            identifier_field: "email".to_string(),
            secret_field: "password".to_string(),
            encoding: LoginEncoding::Json,
            warm_up: false,
            landing_marker: None,
        }
    }

    #[must_use]
    pub fn form(path: &str, landing_marker: &str) -> Self {
        Self {
            path: path.to_string(),
            identifier_field: "email".to_string(),
            secret_field: "password".to_string(),
            encoding: LoginEncoding::Form,
            warm_up: true,
            landing_marker: Some(landing_marker.to_string()),
        }
    }
}

/// How an authenticated session proves itself on later requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    BearerToken,
    SessionCookie,
}

/// Finds the bearer token in a login response, trying [`TOKEN_PATHS`] in order.
#[must_use]
pub fn locate_bearer_token(body: &Value) -> Option<String> {
    TOKEN_PATHS.iter().find_map(|path| {
        path.iter()
            .try_fold(body, |node, key| node.get(*key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
    })
}

/// `true` when the body carries an explicit success flag.
pub(crate) fn has_success_flag(body: &Value) -> bool {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return true;
    }
    body.get("status")
        .and_then(Value::as_str)
        .is_some_and(|s| s.eq_ignore_ascii_case("success") || s.eq_ignore_ascii_case("ok"))
}
