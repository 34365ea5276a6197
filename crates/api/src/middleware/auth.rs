//! Authentication extractors for Axum handlers.
//!
//! Credentials are checked in order:
//!
//! 1. `Authorization: Bearer <jwt>`
//! 2. `Authorization: Basic <base64>` against the configured administrator
//! 3. the session cookie set by form or OAuth2 sign-in
//!
//! A credential that is present but wrong is always a 401. Missing
//! credentials are answered according to [`AuthMode`]. A stale session
//! cookie counts as missing so browsers are sent back to the login page.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use registrar_core::error::CoreError;
use registrar_core::roles::ROLE_ADMIN;
use registrar_core::types::DbId;

use crate::auth::basic::decode_basic;
use crate::auth::cookies::{read_cookie, SESSION_COOKIE};
use crate::auth::jwt::{validate_token, Claims};
use crate::config::AuthMode;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated principal.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(username = %user.username, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    /// The role name (`"admin"` or `"user"`).
    pub role: String,
    /// Database id for OAuth2-linked users; `None` for the configured admin.
    pub user_id: Option<DbId>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
            user_id: claims.uid,
        }
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// Resolve the request's principal, if any credentials were sent.
///
/// Returns `Ok(None)` when no usable credentials are present and an error
/// when credentials are present but invalid.
pub async fn authenticate(
    parts: &Parts,
    state: &AppState,
) -> Result<Option<AuthUser>, AppError> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let value = header
            .to_str()
            .map_err(|_| unauthorized("Malformed Authorization header"))?;
        return authenticate_header(value, state).await.map(Some);
    }

    let Some(token) = read_cookie(&parts.headers, SESSION_COOKIE) else {
        return Ok(None);
    };
    match validate_token(token, &state.config.jwt) {
        Ok(claims) => Ok(Some(claims.into())),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session cookie");
            Ok(None)
        }
    }
}

async fn authenticate_header(value: &str, state: &AppState) -> Result<AuthUser, AppError> {
    if let Some(token) = value.strip_prefix("Bearer ") {
        let claims = validate_token(token.trim(), &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;
        return Ok(claims.into());
    }

    if let Some(encoded) = value.strip_prefix("Basic ") {
        let creds =
            decode_basic(encoded).ok_or_else(|| unauthorized("Malformed Basic credentials"))?;
        let Some(account) = state.config.auth.admin.as_ref() else {
            return Err(unauthorized("Invalid username or password"));
        };
        if !account
            .verify_blocking(&creds.username, &creds.password)
            .await?
        {
            return Err(unauthorized("Invalid username or password"));
        }
        return Ok(AuthUser {
            username: account.username.clone(),
            role: account.role.clone(),
            user_id: None,
        });
    }

    Err(unauthorized(
        "Unsupported Authorization scheme. Expected: Bearer or Basic",
    ))
}

/// The rejection for a protected route reached without credentials.
pub fn login_challenge(mode: AuthMode) -> AppError {
    match mode {
        AuthMode::Api => unauthorized("Authentication required"),
        AuthMode::Interactive => AppError::LoginRequired,
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)
            .await?
            .ok_or_else(|| login_challenge(state.config.auth.mode))
    }
}

/// `Option<AuthUser>` for public pages that adapt to a signed-in user.
/// Invalid credentials are still rejected.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        authenticate(parts, state).await
    }
}
