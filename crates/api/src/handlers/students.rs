//! Handlers for the `/students` resource.
//!
//! The list and search endpoints take the backend from `?source=`; the other
//! endpoints take it from the path. Either way an unknown name is handled by
//! the configured [`BackendSelection`](registrar_core::backend::BackendSelection).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use registrar_core::backend::resolve;
use registrar_core::error::CoreError;
use registrar_core::types::DbId;
use registrar_db::models::student::{Student, StudentPayload, StudentResponse};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireBackendAccess;
use crate::query::{SearchParams, SourceParams};
use crate::services::students::StudentService;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A student as returned to clients.
///
/// `Summary` unless `EXPOSE_SENSITIVE_FIELDS` is enabled.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StudentBody {
    Summary(StudentResponse),
    Full(Student),
}

fn render(state: &AppState, student: Student) -> StudentBody {
    if state.config.expose_sensitive_fields {
        StudentBody::Full(student)
    } else {
        StudentBody::Summary(StudentResponse::from(&student))
    }
}

fn render_all(state: &AppState, students: Vec<Student>) -> Vec<StudentBody> {
    students.into_iter().map(|s| render(state, s)).collect()
}

/// Pick the service for a caller-supplied backend name.
fn service_for(state: &AppState, raw: Option<&str>) -> AppResult<StudentService> {
    let resolved = resolve(raw, state.config.backend_selection).map_err(|e| match e {
        CoreError::Validation(msg) => AppError::BadRequest(msg),
        other => AppError::Core(other),
    })?;
    if resolved.fell_back {
        tracing::warn!(
            requested = raw.unwrap_or_default(),
            fallback = %resolved.backend,
            "Unknown backend requested, using primary"
        );
    }
    Ok(StudentService::new(state.backends.get(resolved.backend)))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Student",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/students?source=
pub async fn list_students(
    State(state): State<AppState>,
    _user: AuthUser,
    QueryParams(params): QueryParams<SourceParams>,
) -> AppResult<Json<Vec<StudentBody>>> {
    let service = service_for(&state, params.source.as_deref())?;
    let students = service.list().await?;
    Ok(Json(render_all(&state, students)))
}

/// GET /api/students/search?name=&minAge=&source=
///
/// `name` wins over `minAge`; with neither, returns the full list.
pub async fn search_students(
    State(state): State<AppState>,
    _user: AuthUser,
    QueryParams(params): QueryParams<SearchParams>,
) -> AppResult<Json<Vec<StudentBody>>> {
    let service = service_for(&state, params.source.as_deref())?;
    let students = service
        .search(params.name.as_deref(), params.min_age)
        .await?;
    Ok(Json(render_all(&state, students)))
}

/// GET /api/students/{backend}/{id}
pub async fn get_student(
    State(state): State<AppState>,
    _access: RequireBackendAccess,
    PathParam((backend, id)): PathParam<(String, DbId)>,
) -> AppResult<Json<StudentBody>> {
    let service = service_for(&state, Some(&backend))?;
    let student = service.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(render(&state, student)))
}

/// POST /api/students/{backend}
pub async fn create_student(
    State(state): State<AppState>,
    _access: RequireBackendAccess,
    PathParam(backend): PathParam<String>,
    JsonBody(input): JsonBody<StudentPayload>,
) -> AppResult<(StatusCode, Json<StudentBody>)> {
    let service = service_for(&state, Some(&backend))?;
    let student = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(render(&state, student))))
}

/// PUT /api/students/{backend}/{id}
///
/// Omitted fields keep their stored values.
pub async fn update_student(
    State(state): State<AppState>,
    _access: RequireBackendAccess,
    PathParam((backend, id)): PathParam<(String, DbId)>,
    JsonBody(input): JsonBody<StudentPayload>,
) -> AppResult<Json<StudentBody>> {
    let service = service_for(&state, Some(&backend))?;
    let student = service
        .update(id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(render(&state, student)))
}

/// DELETE /api/students/{backend}/{id}
pub async fn delete_student(
    State(state): State<AppState>,
    _access: RequireBackendAccess,
    PathParam((backend, id)): PathParam<(String, DbId)>,
) -> AppResult<StatusCode> {
    let service = service_for(&state, Some(&backend))?;
    if !service.delete(id).await? {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
