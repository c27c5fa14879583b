use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::students::handlers;
use crate::features::students::services::StudentService;

/// Create routes for the students feature
pub fn routes(service: Arc<StudentService>) -> Router {
    Router::new()
        .route(
            "/api/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .route(
            "/api/students/{id}",
            get(handlers::get_student)
                .put(handlers::update_student)
                .delete(handlers::delete_student),
        )
        .route(
            "/api/students/{id}/attendance",
            get(handlers::get_student_attendance),
        )
        .with_state(service)
}
