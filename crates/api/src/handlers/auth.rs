//! Sign-in and sign-out handlers: login page, form login, API tokens and the
//! OAuth2 authorization-code flow.

use axum::extract::{Form, Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::Json;
use registrar_core::error::CoreError;
use registrar_core::identity::{ExternalProfile, OAuthProvider};
use registrar_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::auth::cookies::{
    build_cookie, clear_cookie, read_cookie, OAUTH_STATE_COOKIE, OAUTH_STATE_MAX_AGE_SECS,
    SESSION_COOKIE,
};
use crate::auth::jwt::generate_access_token;
use crate::auth::local::LocalAccount;
use crate::auth::oauth::{
    exchange_code, fetch_user_attributes, generate_state, state_cookie_value, state_matches,
    OAuthClientConfig,
};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::services::accounts::link_external_identity;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query of `GET /login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginPageParams {
    pub error: Option<String>,
    pub logout: Option<String>,
}

/// Form body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /api/auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Query of the OAuth2 callback.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn issue_token(
    state: &AppState,
    username: &str,
    role: &str,
    user_id: Option<DbId>,
) -> AppResult<String> {
    generate_access_token(username, role, user_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))
}

async fn verify_admin<'a>(
    state: &'a AppState,
    username: &str,
    password: &str,
) -> AppResult<Option<&'a LocalAccount>> {
    let Some(account) = state.config.auth.admin.as_ref() else {
        return Ok(None);
    };
    let matched = account.verify_blocking(username, password).await?;
    Ok(matched.then_some(account))
}

/// 303 to `/` with the session cookie set, plus any extra cookies.
fn signed_in(state: &AppState, token: &str, extra: Option<String>) -> Response {
    let secure = state.config.auth.secure_cookies;
    let session = build_cookie(
        SESSION_COOKIE,
        token,
        state.config.jwt.expires_in_secs(),
        secure,
    );
    let cookies: Vec<_> = std::iter::once(session)
        .chain(extra)
        .map(|c| (SET_COOKIE, c))
        .collect();
    (AppendHeaders(cookies), Redirect::to("/")).into_response()
}

/// 303 back to the login page after a failed OAuth2 round trip.
fn oauth_failed(state: &AppState) -> Response {
    let clear = clear_cookie(OAUTH_STATE_COOKIE, state.config.auth.secure_cookies);
    (
        AppendHeaders([(SET_COOKIE, clear)]),
        Redirect::to("/login?error=oauth"),
    )
        .into_response()
}

fn configured_client(state: &AppState, raw: &str) -> AppResult<OAuthClientConfig> {
    let provider: OAuthProvider = raw.parse().map_err(|e| match e {
        CoreError::Validation(msg) => AppError::BadRequest(msg),
        other => AppError::Core(other),
    })?;
    state
        .config
        .oauth
        .client(provider)
        .cloned()
        .ok_or_else(|| {
            AppError::BadRequest(format!("OAuth2 provider '{provider}' is not configured"))
        })
}

fn render_login_page(state: &AppState, params: &LoginPageParams) -> String {
    let mut notice = String::new();
    if params.error.is_some() {
        notice.push_str(r#"<p class="error">Sign-in failed.</p>"#);
    }
    if params.logout.is_some() {
        notice.push_str(r#"<p class="notice">You have been signed out.</p>"#);
    }

    let providers: String = state
        .config
        .oauth
        .providers
        .iter()
        .map(|c| {
            format!(
                r#"<li><a href="/oauth2/authorization/{}">Sign in with {}</a></li>"#,
                c.provider,
                c.provider.display_name()
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Sign in</title></head>
<body>
<h1>Sign in</h1>
{notice}
<form method="post" action="/login">
<label>Username <input name="username" autocomplete="username"></label>
<label>Password <input name="password" type="password" autocomplete="current-password"></label>
<button type="submit">Sign in</button>
</form>
<ul>{providers}</ul>
</body>
</html>
"#
    )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /login
pub async fn login_page(
    State(state): State<AppState>,
    Query(params): Query<LoginPageParams>,
) -> Html<String> {
    Html(render_login_page(&state, &params))
}

/// POST /login
///
/// Success sets the session cookie and redirects to `/`; failure redirects
/// back to the login page.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let Some(account) = verify_admin(&state, &form.username, &form.password).await? else {
        tracing::warn!(username = %form.username, "Form login failed");
        return Ok(Redirect::to("/login?error").into_response());
    };

    let token = issue_token(&state, &account.username, &account.role, None)?;
    tracing::info!(username = %account.username, "Form login succeeded");
    Ok(signed_in(&state, &token, None))
}

/// POST /logout
pub async fn logout(State(state): State<AppState>) -> Response {
    let clear = clear_cookie(SESSION_COOKIE, state.config.auth.secure_cookies);
    (AppendHeaders([(SET_COOKIE, clear)]), Redirect::to("/")).into_response()
}

/// POST /api/auth/token
///
/// Exchange administrator credentials for a bearer token.
pub async fn token(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let account = verify_admin(&state, &input.username, &input.password)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    let access_token = issue_token(&state, &account.username, &account.role, None)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
    }))
}

/// GET /oauth2/authorization/{provider}
///
/// Redirect the browser to the provider with a fresh `state`.
pub async fn oauth_authorize(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> AppResult<Response> {
    let client = configured_client(&state, &provider)?;
    let nonce = generate_state();
    let url = client
        .authorization_url(&state.config.oauth.public_base_url, &nonce)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let cookie = build_cookie(
        OAUTH_STATE_COOKIE,
        &state_cookie_value(client.provider, &nonce),
        OAUTH_STATE_MAX_AGE_SECS,
        state.config.auth.secure_cookies,
    );
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Redirect::to(url.as_str()),
    )
        .into_response())
}

/// GET /login/oauth2/code/{provider}
///
/// Verify `state`, exchange the code, link the profile to a local user and
/// start a session. Provider-side failures send the browser back to the
/// login page.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let client = configured_client(&state, &provider)?;
    let provider = client.provider;

    if let Some(error) = &params.error {
        tracing::warn!(%provider, %error, "OAuth2 provider returned an error");
        return Ok(oauth_failed(&state));
    }
    let (Some(code), Some(nonce)) = (params.code.as_deref(), params.state.as_deref()) else {
        tracing::warn!(%provider, "OAuth2 callback without code or state");
        return Ok(oauth_failed(&state));
    };
    if !state_matches(read_cookie(&headers, OAUTH_STATE_COOKIE), provider, nonce) {
        tracing::warn!(%provider, "OAuth2 state mismatch");
        return Ok(oauth_failed(&state));
    }

    let base_url = &state.config.oauth.public_base_url;
    let attrs = match exchange_code(&state.http, &client, base_url, code).await {
        Ok(access_token) => fetch_user_attributes(&state.http, &client, &access_token).await,
        Err(e) => Err(e),
    };
    let attrs = match attrs {
        Ok(attrs) => attrs,
        Err(e) => {
            tracing::warn!(%provider, error = %e, "OAuth2 exchange failed");
            return Ok(oauth_failed(&state));
        }
    };
    let profile = match ExternalProfile::from_attributes(provider, &attrs) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(%provider, error = %e, "OAuth2 profile incomplete");
            return Ok(oauth_failed(&state));
        }
    };

    let user = link_external_identity(state.users.as_ref(), &profile).await?;
    let token = issue_token(&state, &user.username, &user.role, Some(user.id))?;
    tracing::info!(user_id = user.id, %provider, "OAuth2 sign-in succeeded");

    let clear = clear_cookie(OAUTH_STATE_COOKIE, state.config.auth.secure_cookies);
    Ok(signed_in(&state, &token, Some(clear)))
}
