//! Session and OAuth2 state cookies.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Holds the JWT of an interactive session.
pub const SESSION_COOKIE: &str = "registrar_session";

/// Holds `<provider>:<state>` between the OAuth2 redirect and callback.
pub const OAUTH_STATE_COOKIE: &str = "registrar_oauth_state";

/// Lifetime of the OAuth2 state cookie in seconds.
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;

/// Find a cookie value across all `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Build a `Set-Cookie` value for an HttpOnly, SameSite=Lax cookie.
pub fn build_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a `Set-Cookie` value that removes the cookie.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    build_cookie(name, "", 0, secure)
}
