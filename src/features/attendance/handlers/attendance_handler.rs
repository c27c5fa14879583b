use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::attendance::dtos::{
    AttendancePayloadDto, AttendanceQueryParams, AttendanceResponseDto,
    AttendanceStatisticsDto, AttendanceStatsQueryParams,
};
use crate::features::attendance::services::AttendanceService;
use crate::shared::types::ApiResponse;

/// List attendance records
///
/// Supports filtering by student, class, status and an inclusive date range.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQueryParams),
    responses(
        (status = 200, description = "List of attendance records", body = ApiResponse<Vec<AttendanceResponseDto>>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "attendance"
)]
pub async fn list_attendance(
    State(service): State<Arc<AttendanceService>>,
    AppQuery(params): AppQuery<AttendanceQueryParams>,
) -> Result<Json<ApiResponse<Vec<AttendanceResponseDto>>>> {
    let records = service.list(params.into()).await?;
    Ok(Json(ApiResponse::list(records)))
}

/// Get an attendance record by ID
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance ID")
    ),
    responses(
        (status = 200, description = "Attendance record found", body = ApiResponse<AttendanceResponseDto>),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "attendance"
)]
pub async fn get_attendance(
    State(service): State<Arc<AttendanceService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<AttendanceResponseDto>>> {
    let record = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(record), None)))
}

/// Mark attendance
///
/// `date` defaults to today and `status` to `Present`.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendancePayloadDto,
    responses(
        (status = 201, description = "Attendance marked", body = ApiResponse<AttendanceResponseDto>),
        (status = 400, description = "Validation error or attendance already marked"),
        (status = 404, description = "Student or class not found")
    ),
    tag = "attendance"
)]
pub async fn create_attendance(
    State(service): State<Arc<AttendanceService>>,
    AppJson(dto): AppJson<AttendancePayloadDto>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceResponseDto>>)> {
    let mark = dto.into_mark(Utc::now().date_naive())?;
    let record = service.create(mark).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(record),
            Some("Attendance marked successfully".to_string()),
        )),
    ))
}

/// Replace an attendance record
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance ID")
    ),
    request_body = AttendancePayloadDto,
    responses(
        (status = 200, description = "Attendance updated", body = ApiResponse<AttendanceResponseDto>),
        (status = 400, description = "Validation error or attendance already marked"),
        (status = 404, description = "Attendance, student or class not found")
    ),
    tag = "attendance"
)]
pub async fn update_attendance(
    State(service): State<Arc<AttendanceService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<AttendancePayloadDto>,
) -> Result<Json<ApiResponse<AttendanceResponseDto>>> {
    let mark = dto.into_mark(Utc::now().date_naive())?;
    let record = service.update(id, mark).await?;

    Ok(Json(ApiResponse::success(
        Some(record),
        Some("Attendance updated successfully".to_string()),
    )))
}

/// Delete an attendance record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = Uuid, Path, description = "Attendance ID")
    ),
    responses(
        (status = 200, description = "Attendance deleted"),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "attendance"
)]
pub async fn delete_attendance(
    State(service): State<Arc<AttendanceService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Attendance deleted successfully".to_string()),
    )))
}

/// Attendance statistics
///
/// Status counts and attendance percentage over all matching records.
#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(AttendanceStatsQueryParams),
    responses(
        (status = 200, description = "Attendance statistics", body = ApiResponse<AttendanceStatisticsDto>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "attendance"
)]
pub async fn get_attendance_stats(
    State(service): State<Arc<AttendanceService>>,
    AppQuery(params): AppQuery<AttendanceStatsQueryParams>,
) -> Result<Json<ApiResponse<AttendanceStatisticsDto>>> {
    let stats = service.stats(params.into()).await?;
    Ok(Json(ApiResponse::success(Some(stats), None)))
}
