//! The configured administrator account.

use registrar_core::roles::ROLE_ADMIN;

use super::password::{hash_password, is_valid_hash, verify_password};
use crate::config::{env_opt, ConfigError};
use crate::error::AppError;

/// A username/password principal defined by configuration.
#[derive(Clone)]
pub struct LocalAccount {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl std::fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAccount")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl LocalAccount {
    /// Build an admin account from a plaintext password.
    pub fn admin(username: &str, password: &str) -> Result<Self, ConfigError> {
        let password_hash = hash_password(password).map_err(|e| ConfigError::Invalid {
            var: "ADMIN_PASSWORD",
            reason: e.to_string(),
        })?;
        Ok(Self {
            username: username.to_string(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        })
    }

    /// Load the administrator from `ADMIN_USERNAME` plus either
    /// `ADMIN_PASSWORD_HASH` (PHC string) or `ADMIN_PASSWORD`.
    ///
    /// Returns `None` when neither password variable is set.
    pub fn admin_from_env() -> Result<Option<Self>, ConfigError> {
        let username = env_opt("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());

        if let Some(password_hash) = env_opt("ADMIN_PASSWORD_HASH") {
            if !is_valid_hash(&password_hash) {
                return Err(ConfigError::Invalid {
                    var: "ADMIN_PASSWORD_HASH",
                    reason: "not a PHC-formatted hash".into(),
                });
            }
            return Ok(Some(Self {
                username,
                password_hash,
                role: ROLE_ADMIN.to_string(),
            }));
        }

        env_opt("ADMIN_PASSWORD")
            .map(|password| Self::admin(&username, &password))
            .transpose()
    }

    /// `true` when both the username and the password match.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        match verify_password(password, &self.password_hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(error = %e, "Stored admin password hash is unusable");
                false
            }
        }
    }

    /// [`verify`](Self::verify) on the blocking thread pool, so request
    /// handling never runs Argon2 on a runtime worker.
    pub async fn verify_blocking(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let account = self.clone();
        let username = username.to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || account.verify(&username, &password))
            .await
            .map_err(|e| AppError::InternalError(format!("Password verification task failed: {e}")))
    }
}
