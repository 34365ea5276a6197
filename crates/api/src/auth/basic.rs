//! HTTP Basic credentials (RFC 7617).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Username and password decoded from a Basic `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Decode the credentials part of `Authorization: Basic <credentials>`.
///
/// Returns `None` for invalid base64, non-UTF-8 content or a missing `:`.
/// The password may itself contain colons.
pub fn decode_basic(encoded: &str) -> Option<BasicCredentials> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Encode credentials as a complete `Authorization` header value.
pub fn encode_basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}
