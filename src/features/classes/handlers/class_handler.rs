use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::classes::dtos::{
    ClassAttendanceSummaryDto, ClassPayloadDto, ClassResponseDto,
};
use crate::features::classes::services::ClassService;
use crate::shared::types::ApiResponse;

/// List all classes, newest first
#[utoipa::path(
    get,
    path = "/api/classes",
    responses(
        (status = 200, description = "List of classes", body = ApiResponse<Vec<ClassResponseDto>>),
    ),
    tag = "classes"
)]
pub async fn list_classes(
    State(service): State<Arc<ClassService>>,
) -> Result<Json<ApiResponse<Vec<ClassResponseDto>>>> {
    let classes = service.list().await?;
    Ok(Json(ApiResponse::list(classes)))
}

/// Get class by ID
#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class found", body = ApiResponse<ClassResponseDto>),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn get_class(
    State(service): State<Arc<ClassService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<ClassResponseDto>>> {
    let class = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(class), None)))
}

/// Create a class
#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = ClassPayloadDto,
    responses(
        (status = 201, description = "Class created", body = ApiResponse<ClassResponseDto>),
        (status = 400, description = "Validation error, or name/subject pair already used")
    ),
    tag = "classes"
)]
pub async fn create_class(
    State(service): State<Arc<ClassService>>,
    AppJson(dto): AppJson<ClassPayloadDto>,
) -> Result<(StatusCode, Json<ApiResponse<ClassResponseDto>>)> {
    let dto = dto.into_valid()?;
    let class = service.create(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(class),
            Some("Class created successfully".to_string()),
        )),
    ))
}

/// Replace a class
#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = ClassPayloadDto,
    responses(
        (status = 200, description = "Class updated", body = ApiResponse<ClassResponseDto>),
        (status = 400, description = "Validation error, or name/subject pair used by another class"),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn update_class(
    State(service): State<Arc<ClassService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<ClassPayloadDto>,
) -> Result<Json<ApiResponse<ClassResponseDto>>> {
    let dto = dto.into_valid()?;
    let class = service.update(id, dto).await?;

    Ok(Json(ApiResponse::success(
        Some(class),
        Some("Class updated successfully".to_string()),
    )))
}

/// Delete a class
///
/// Rejected while attendance records reference the class.
#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class deleted"),
        (status = 400, description = "Class has attendance records"),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn delete_class(
    State(service): State<Arc<ClassService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Class deleted successfully".to_string()),
    )))
}

/// Class attendance with overall and per-day summary
#[utoipa::path(
    get,
    path = "/api/classes/{id}/attendance-summary",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class attendance summary", body = ApiResponse<ClassAttendanceSummaryDto>),
        (status = 404, description = "Class not found")
    ),
    tag = "classes"
)]
pub async fn get_class_attendance_summary(
    State(service): State<Arc<ClassService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<ClassAttendanceSummaryDto>>> {
    let summary = service.attendance_summary(id).await?;
    Ok(Json(ApiResponse::success(Some(summary), None)))
}
