//! Mapping from external identity-provider profiles to local identities.
//!
//! An OAuth2 provider returns a JSON attribute map describing the signed-in
//! user. Each provider names its fields differently; [`ExternalProfile`] is
//! the normalised form used to find or create the matching local user.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::CoreError;

/// Supported OAuth2 identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Github,
    Google,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 2] = [OAuthProvider::Github, OAuthProvider::Google];

    /// Registration id used in URLs and stored in `users.provider`.
    pub fn as_str(self) -> &'static str {
        match self {
            OAuthProvider::Github => "github",
            OAuthProvider::Google => "google",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            OAuthProvider::Github => "GitHub",
            OAuthProvider::Google => "Google",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OAuthProvider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::Validation(format!("Unknown OAuth2 provider '{s}'")))
    }
}

/// Provider-independent view of a signed-in external user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    pub provider: OAuthProvider,
    /// Stable subject identifier issued by the provider.
    pub provider_id: String,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
}

impl ExternalProfile {
    /// Build a profile from a provider's user-info attribute map.
    ///
    /// GitHub may withhold the email address; in that case a synthetic
    /// `<login>@github.com` address is derived so the profile still has a
    /// natural key. Google profiles must carry an email.
    pub fn from_attributes(provider: OAuthProvider, attrs: &Value) -> Result<Self, CoreError> {
        let name = non_empty_str(attrs, "name");

        match provider {
            OAuthProvider::Github => {
                let login = non_empty_str(attrs, "login").ok_or_else(|| missing("login"))?;
                let provider_id = match attrs.get("id") {
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::String(s)) if !s.is_empty() => s.clone(),
                    _ => return Err(missing("id")),
                };
                let email =
                    non_empty_str(attrs, "email").unwrap_or_else(|| format!("{login}@github.com"));

                Ok(ExternalProfile {
                    provider,
                    provider_id,
                    username: login,
                    email,
                    name,
                })
            }
            OAuthProvider::Google => {
                let email = non_empty_str(attrs, "email").ok_or_else(|| missing("email"))?;
                let provider_id = non_empty_str(attrs, "sub").ok_or_else(|| missing("sub"))?;

                Ok(ExternalProfile {
                    provider,
                    provider_id,
                    username: email.clone(),
                    email,
                    name,
                })
            }
        }
    }
}

fn non_empty_str(attrs: &Value, key: &str) -> Option<String> {
    attrs
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn missing(field: &str) -> CoreError {
    CoreError::Unauthorized(format!("Identity provider profile is missing '{field}'"))
}
