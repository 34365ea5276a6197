//! Route definitions for sign-in, sign-out and identity.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, home};
use crate::state::AppState;

/// Browser-facing routes mounted at the root.
///
/// ```text
/// GET  /                                 -> home
/// GET  /login                            -> login_page
/// POST /login                            -> login (form)
/// POST /logout                           -> logout
/// GET  /user-info                        -> user_info (requires auth)
/// GET  /oauth2/authorization/{provider}  -> oauth_authorize
/// GET  /login/oauth2/code/{provider}     -> oauth_callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user-info", get(home::user_info))
        .route("/oauth2/authorization/{provider}", get(auth::oauth_authorize))
        .route("/login/oauth2/code/{provider}", get(auth::oauth_callback))
}

/// Routes mounted at `/api/auth`.
///
/// ```text
/// POST /token  -> token
/// ```
pub fn api_router() -> Router<AppState> {
    Router::new().route("/token", post(auth::token))
}
