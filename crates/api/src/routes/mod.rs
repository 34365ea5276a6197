pub mod auth;
pub mod health;
pub mod students;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /students   students CRUD and search
/// /auth       bearer token issuance
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/students", students::router())
        .nest("/auth", auth::api_router())
}
