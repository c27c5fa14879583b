use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::classes::handlers;
use crate::features::classes::services::ClassService;

/// Create routes for the classes feature
pub fn routes(service: Arc<ClassService>) -> Router {
    Router::new()
        .route(
            "/api/classes",
            get(handlers::list_classes).post(handlers::create_class),
        )
        .route(
            "/api/classes/{id}",
            get(handlers::get_class)
                .put(handlers::update_class)
                .delete(handlers::delete_class),
        )
        .route(
            "/api/classes/{id}/attendance-summary",
            get(handlers::get_class_attendance_summary),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{lazy_pool, test_pool, unique_suffix};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server_with(pool: sqlx::PgPool) -> TestServer {
        TestServer::new(routes(Arc::new(ClassService::new(pool)))).unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported() {
        let response = server_with(lazy_pool())
            .post("/api/classes")
            .json(&json!({ "name": " X " }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["message"], "Validation errors");
        assert_eq!(
            body["errors"],
            json!([
                { "field": "name", "message": "Class name must be at least 2 characters long" },
                { "field": "subject", "message": "Subject is required" },
                { "field": "teacher", "message": "Teacher name is required" },
            ])
        );
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let response = server_with(lazy_pool())
            .get("/api/classes/not-a-uuid/attendance-summary")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_class_lifecycle_over_http() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let server = server_with(pool);
        let name = format!("Grade 9 {}", unique_suffix());

        let created = server
            .post("/api/classes")
            .json(&json!({ "name": name, "subject": "Physics", "teacher": "Mr. Rao" }))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);
        let body: Value = created.json();
        assert_eq!(body["message"], "Class created successfully");
        let id = body["data"]["_id"].as_str().unwrap().to_string();

        let duplicate = server
            .post("/api/classes")
            .json(&json!({ "name": name, "subject": "Physics", "teacher": "Ms. Iyer" }))
            .await;
        assert_eq!(duplicate.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = duplicate.json();
        assert_eq!(
            body["message"],
            "Class with this name and subject already exists"
        );

        let updated = server
            .put(&format!("/api/classes/{}", id))
            .json(&json!({ "name": name, "subject": "Physics", "teacher": "Ms. Iyer" }))
            .await;
        assert_eq!(updated.status_code(), StatusCode::OK);
        let body: Value = updated.json();
        assert_eq!(body["data"]["teacher"], "Ms. Iyer");

        let summary: Value = server
            .get(&format!("/api/classes/{}/attendance-summary", id))
            .await
            .json();
        assert_eq!(summary["data"]["summary"]["total"], 0);
        assert_eq!(summary["data"]["dailySummary"], json!({}));

        let deleted = server.delete(&format!("/api/classes/{}", id)).await;
        assert_eq!(deleted.status_code(), StatusCode::OK);
        let body: Value = deleted.json();
        assert_eq!(body["message"], "Class deleted successfully");

        let missing = server.get(&format!("/api/classes/{}", id)).await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }
}
