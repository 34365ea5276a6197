//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the requirement. Use these in route handlers to enforce
//! authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use registrar_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Guards the backend-qualified student routes.
///
/// Any authenticated user passes unless `ADMIN_ONLY_BACKEND_ROUTES` is set,
/// in which case non-admins are rejected with 403 Forbidden.
///
/// ```ignore
/// async fn get_student(RequireBackendAccess(user): RequireBackendAccess) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireBackendAccess(pub AuthUser);

impl FromRequestParts<AppState> for RequireBackendAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user =
            <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;
        if state.config.auth.admin_only_backend_routes && !user.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireBackendAccess(user))
    }
}
