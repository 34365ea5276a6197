//! Home and identity endpoints.

use axum::extract::State;
use axum::Json;
use registrar_db::models::user::User;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Where to sign in, for anonymous callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub username: String,
    pub role: String,
    /// The linked user record; `None` for the configured administrator.
    pub user: Option<User>,
}

/// GET /
pub async fn home(user: Option<AuthUser>) -> Json<HomeResponse> {
    Json(match user {
        Some(user) => HomeResponse {
            authenticated: true,
            username: Some(user.username),
            role: Some(user.role),
            login: None,
        },
        None => HomeResponse {
            authenticated: false,
            username: None,
            role: None,
            login: Some("/login"),
        },
    })
}

/// GET /user-info
pub async fn user_info(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<UserInfoResponse>> {
    let record = match user.user_id {
        Some(id) => state.users.find_by_id(id).await?,
        None => None,
    };

    Ok(Json(UserInfoResponse {
        username: user.username,
        role: user.role,
        user: record,
    }))
}
