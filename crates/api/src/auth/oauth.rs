//! OAuth2 authorization-code flow against GitHub and Google.
//!
//! The server redirects the browser to the provider, receives the code at
//! `/login/oauth2/code/{provider}`, exchanges it for an access token and
//! reads the user-info document. The resulting attribute map is normalised
//! by [`registrar_core::identity::ExternalProfile`].

use rand::distr::Alphanumeric;
use rand::Rng;
use registrar_core::identity::OAuthProvider;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::config::env_opt;

/// Length of the random `state` parameter.
const STATE_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("OAuth2 provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OAuth2 token exchange failed: {0}")]
    Token(String),

    #[error("invalid OAuth2 client configuration: {0}")]
    Config(String),
}

/// Client registration for one provider.
#[derive(Clone)]
pub struct OAuthClientConfig {
    pub provider: OAuthProvider,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub scopes: String,
}

impl std::fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl OAuthClientConfig {
    /// Registration with the provider's public endpoints.
    pub fn new(provider: OAuthProvider, client_id: &str, client_secret: &str) -> Self {
        let (authorize_url, token_url, userinfo_url, scopes) = match provider {
            OAuthProvider::Github => (
                "https://github.com/login/oauth/authorize",
                "https://github.com/login/oauth/access_token",
                "https://api.github.com/user",
                "read:user user:email",
            ),
            OAuthProvider::Google => (
                "https://accounts.google.com/o/oauth2/v2/auth",
                "https://oauth2.googleapis.com/token",
                "https://openidconnect.googleapis.com/v1/userinfo",
                "openid profile email",
            ),
        };

        Self {
            provider,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            authorize_url: authorize_url.to_string(),
            token_url: token_url.to_string(),
            userinfo_url: userinfo_url.to_string(),
            scopes: scopes.to_string(),
        }
    }

    /// Read `<PROVIDER>_CLIENT_ID` and `<PROVIDER>_CLIENT_SECRET`. The provider
    /// is disabled unless both are set.
    pub fn from_env(provider: OAuthProvider) -> Option<Self> {
        let prefix = provider.as_str().to_ascii_uppercase();
        let client_id = env_opt(&format!("{prefix}_CLIENT_ID"))?;
        let client_secret = env_opt(&format!("{prefix}_CLIENT_SECRET"))?;
        Some(Self::new(provider, &client_id, &client_secret))
    }

    pub fn redirect_uri(&self, public_base_url: &str) -> String {
        format!("{public_base_url}/login/oauth2/code/{}", self.provider)
    }

    /// The provider URL the browser is sent to.
    pub fn authorization_url(
        &self,
        public_base_url: &str,
        state: &str,
    ) -> Result<Url, OAuthError> {
        let redirect_uri = self.redirect_uri(public_base_url);
        Url::parse_with_params(
            &self.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", self.scopes.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| OAuthError::Config(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Exchange an authorization code for a provider access token.
pub async fn exchange_code(
    http: &reqwest::Client,
    client: &OAuthClientConfig,
    public_base_url: &str,
    code: &str,
) -> Result<String, OAuthError> {
    let redirect_uri = client.redirect_uri(public_base_url);
    let response: TokenResponse = http
        .post(&client.token_url)
        .header(ACCEPT, "application/json")
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    match response {
        TokenResponse {
            access_token: Some(token),
            ..
        } => Ok(token),
        TokenResponse {
            error,
            error_description,
            ..
        } => Err(OAuthError::Token(
            error_description
                .or(error)
                .unwrap_or_else(|| "no access_token in response".into()),
        )),
    }
}

/// Fetch the signed-in user's attribute map.
pub async fn fetch_user_attributes(
    http: &reqwest::Client,
    client: &OAuthClientConfig,
    access_token: &str,
) -> Result<Value, OAuthError> {
    let attrs = http
        .get(&client.userinfo_url)
        .bearer_auth(access_token)
        .header(ACCEPT, "application/json")
        .header(USER_AGENT, concat!("registrar/", env!("CARGO_PKG_VERSION")))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(attrs)
}

/// Random value for the `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_LEN)
        .map(char::from)
        .collect()
}

/// Value stored in the state cookie for `provider`.
pub fn state_cookie_value(provider: OAuthProvider, state: &str) -> String {
    format!("{provider}:{state}")
}

/// `true` when the callback's `state` matches the cookie set at redirect time.
pub fn state_matches(cookie: Option<&str>, provider: OAuthProvider, state: &str) -> bool {
    !state.is_empty() && cookie == Some(state_cookie_value(provider, state).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_carries_client_and_state() {
        let client = OAuthClientConfig::new(OAuthProvider::Github, "cid", "secret");
        let url = client
            .authorization_url("http://localhost:3000", "xyz")
            .unwrap();

        assert_eq!(url.host_str(), Some("github.com"));
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(params.contains(&("client_id".into(), "cid".into())));
        assert!(params.contains(&("state".into(), "xyz".into())));
        assert!(params.contains(&(
            "redirect_uri".into(),
            "http://localhost:3000/login/oauth2/code/github".into()
        )));
        assert!(!url.as_str().contains("secret"));
    }

    #[test]
    fn state_is_random_alphanumeric() {
        let a = generate_state();
        let b = generate_state();
        assert_eq!(a.len(), STATE_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn state_must_match_provider_and_value() {
        let cookie = state_cookie_value(OAuthProvider::Google, "abc");
        assert!(state_matches(Some(&cookie), OAuthProvider::Google, "abc"));
        assert!(!state_matches(Some(&cookie), OAuthProvider::Github, "abc"));
        assert!(!state_matches(Some(&cookie), OAuthProvider::Google, "abd"));
        assert!(!state_matches(None, OAuthProvider::Google, "abc"));
    }
}
