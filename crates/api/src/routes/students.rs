//! Route definitions for the `/students` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::students;
use crate::state::AppState;

/// Routes mounted at `/students`.
///
/// ```text
/// GET    /                 -> list_students (?source=)
/// GET    /search           -> search_students (?name=&minAge=&source=)
/// POST   /{backend}        -> create_student
/// GET    /{backend}/{id}   -> get_student
/// PUT    /{backend}/{id}   -> update_student
/// DELETE /{backend}/{id}   -> delete_student
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(students::list_students))
        .route("/search", get(students::search_students))
        .route("/{backend}", post(students::create_student))
        .route(
            "/{backend}/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
}
