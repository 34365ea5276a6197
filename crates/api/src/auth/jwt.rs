//! JWT access-token generation and validation.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! same tokens are issued to API clients (`POST /api/auth/token`) and stored
//! in the session cookie after an interactive sign-in.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use registrar_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{env_opt, parse_env, ConfigError};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the principal's username.
    pub sub: String,
    /// The principal's role name (`"admin"` or `"user"`).
    pub role: String,
    /// Database id for OAuth2-linked users; absent for the configured admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<DbId>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `60`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env_opt("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let access_token_expiry_mins: i64 = parse_env("JWT_ACCESS_EXPIRY_MINS", "60")?;
        if access_token_expiry_mins <= 0 {
            return Err(ConfigError::Invalid {
                var: "JWT_ACCESS_EXPIRY_MINS",
                reason: "must be positive".into(),
            });
        }

        Ok(Self {
            secret,
            access_token_expiry_mins,
        })
    }

    /// Access token lifetime in seconds.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Generate an HS256 access token for the given principal.
pub fn generate_access_token(
    username: &str,
    role: &str,
    user_id: Option<DbId>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.expires_in_secs();

    let claims = Claims {
        sub: username.to_string(),
        role: role.to_string(),
        uid: user_id,
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let token = generate_access_token("alice", "user", Some(42), &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, "user");
        assert_eq!(claims.uid, Some(42));
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_admin_token_has_no_user_id() {
        let config = test_config();
        let token = generate_access_token("admin", "admin", None, &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.uid, None);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "alice".to_string(),
            role: "user".to_string(),
            uid: None,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            access_token_expiry_mins: 60,
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            access_token_expiry_mins: 60,
        };

        let token = generate_access_token("alice", "user", None, &config_a).unwrap();
        assert!(validate_token(&token, &config_b).is_err());
    }
}
