use std::fmt::Display;
use std::str::FromStr;

use registrar_core::backend::BackendSelection;
use registrar_core::identity::OAuthProvider;

use crate::auth::jwt::JwtConfig;
use crate::auth::local::LocalAccount;
use crate::auth::oauth::OAuthClientConfig;

/// Errors raised while loading [`ServerConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// How unauthenticated requests to protected routes are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// 401 with a `WWW-Authenticate: Basic` challenge.
    #[default]
    Api,
    /// 303 redirect to the login page.
    Interactive,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(AuthMode::Api),
            "interactive" => Ok(AuthMode::Interactive),
            other => Err(format!(
                "unknown auth mode '{other}' (expected 'api' or 'interactive')"
            )),
        }
    }
}

/// Log line format, selected by `LOG_FORMAT` (`text` or `json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!(
                "unknown log format '{other}' (expected 'text' or 'json')"
            )),
        }
    }
}

impl LogFormat {
    /// Read `LOG_FORMAT`. Loaded before [`ServerConfig`] so that
    /// configuration errors are already logged in the chosen format.
    pub fn from_env() -> Result<Self, ConfigError> {
        parse_env("LOG_FORMAT", "text")
    }
}

/// Authentication and authorization settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Restrict the backend-qualified student routes to the admin role.
    pub admin_only_backend_routes: bool,
    /// The configured administrator. `None` disables password sign-in.
    pub admin: Option<LocalAccount>,
    /// Add the `Secure` attribute to cookies.
    pub secure_cookies: bool,
}

/// Persistence settings. A missing URL selects an in-memory store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL (primary backend and user store).
    pub primary_url: Option<String>,
    /// MySQL (secondary backend).
    pub secondary_url: Option<String>,
    pub max_connections: u32,
}

/// OAuth2 sign-in settings.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Externally visible origin used to build redirect URIs.
    pub public_base_url: String,
    /// Providers with credentials configured.
    pub providers: Vec<OAuthClientConfig>,
}

impl OAuthConfig {
    pub fn client(&self, provider: OAuthProvider) -> Option<&OAuthClientConfig> {
        self.providers.iter().find(|c| c.provider == provider)
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database: DatabaseConfig,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
    /// Treatment of unknown backend names in query parameters.
    pub backend_selection: BackendSelection,
    /// Return every student field (including `ssn`, `birth` and
    /// `creditCardNumber`) instead of the restricted representation.
    pub expose_sensitive_fields: bool,
    pub oauth: OAuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `HOST`                      | `0.0.0.0`                |
    /// | `PORT`                      | `3000`                   |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                     |
    /// | `PRIMARY_DATABASE_URL`      | unset (in-memory)        |
    /// | `SECONDARY_DATABASE_URL`    | unset (in-memory)        |
    /// | `DB_MAX_CONNECTIONS`        | `20`                     |
    /// | `AUTH_MODE`                 | `api`                    |
    /// | `ADMIN_ONLY_BACKEND_ROUTES` | `false`                  |
    /// | `ADMIN_USERNAME`            | `admin`                  |
    /// | `ADMIN_PASSWORD_HASH`       | unset                    |
    /// | `ADMIN_PASSWORD`            | unset                    |
    /// | `BACKEND_SELECTION`         | `permissive`             |
    /// | `EXPOSE_SENSITIVE_FIELDS`   | `false`                  |
    /// | `SECURE_COOKIES`            | `false`                  |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:3000`  |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`]. An OAuth2
    /// provider is enabled when both `<PROVIDER>_CLIENT_ID` and
    /// `<PROVIDER>_CLIENT_SECRET` are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = parse_env("PORT", "3000")?;

        let cors_origins = parse_origins(&env_or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS));

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", "30")?;

        let database = DatabaseConfig {
            primary_url: env_opt("PRIMARY_DATABASE_URL"),
            secondary_url: env_opt("SECONDARY_DATABASE_URL"),
            max_connections: parse_env("DB_MAX_CONNECTIONS", "20")?,
        };

        let jwt = JwtConfig::from_env()?;

        let auth = AuthConfig {
            mode: parse_env("AUTH_MODE", "api")?,
            admin_only_backend_routes: parse_env("ADMIN_ONLY_BACKEND_ROUTES", "false")?,
            admin: LocalAccount::admin_from_env()?,
            secure_cookies: parse_env("SECURE_COOKIES", "false")?,
        };

        let oauth = OAuthConfig {
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            providers: OAuthProvider::ALL
                .into_iter()
                .filter_map(OAuthClientConfig::from_env)
                .collect(),
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database,
            jwt,
            auth,
            backend_selection: parse_env("BACKEND_SELECTION", "permissive")?,
            expose_sensitive_fields: parse_env("EXPOSE_SENSITIVE_FIELDS", "false")?,
            oauth,
        })
    }
}

/// Read a variable, treating empty values as unset.
pub(crate) fn env_opt(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(var: &str, default: &str) -> String {
    env_opt(var).unwrap_or_else(|| default.to_string())
}

/// Parse a variable (or its default) with `FromStr`.
pub(crate) fn parse_env<T>(var: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    env_or(var, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        })
}

/// Development front-end origin.
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_mode_parses_case_insensitively() {
        assert_eq!("API".parse::<AuthMode>().unwrap(), AuthMode::Api);
        assert_eq!(
            " interactive ".parse::<AuthMode>().unwrap(),
            AuthMode::Interactive
        );
        assert!("form".parse::<AuthMode>().is_err());
    }

    #[test]
    fn default_cors_origin_is_the_dev_frontend() {
        assert_eq!(parse_origins(DEFAULT_CORS_ORIGINS), ["http://localhost:5173"]);
        assert_eq!(
            parse_origins(" https://a.example , ,https://b.example"),
            ["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn log_format_accepts_text_and_json() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("pretty".parse::<LogFormat>().is_err());
    }

    #[test]
    fn invalid_value_names_the_variable() {
        let err = ConfigError::Invalid {
            var: "PORT",
            reason: "invalid digit found in string".into(),
        };
        assert_eq!(err.to_string(), "PORT is invalid: invalid digit found in string");
    }
}
