use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::attendance::handlers;
use crate::features::attendance::services::AttendanceService;

/// Create routes for the attendance feature
pub fn routes(service: Arc<AttendanceService>) -> Router {
    Router::new()
        .route(
            "/api/attendance",
            get(handlers::list_attendance).post(handlers::create_attendance),
        )
        .route("/api/attendance/stats", get(handlers::get_attendance_stats))
        .route(
            "/api/attendance/{id}",
            get(handlers::get_attendance)
                .put(handlers::update_attendance)
                .delete(handlers::delete_attendance),
        )
        .with_state(service)
}
