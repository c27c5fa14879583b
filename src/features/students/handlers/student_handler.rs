use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::students::dtos::{
    StudentAttendanceDto, StudentPayloadDto, StudentResponseDto,
};
use crate::features::students::services::StudentService;
use crate::shared::types::ApiResponse;

/// List all students, newest first
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "List of students", body = ApiResponse<Vec<StudentResponseDto>>),
    ),
    tag = "students"
)]
pub async fn list_students(
    State(service): State<Arc<StudentService>>,
) -> Result<Json<ApiResponse<Vec<StudentResponseDto>>>> {
    let students = service.list().await?;
    Ok(Json(ApiResponse::list(students)))
}

/// Get student by ID
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student found", body = ApiResponse<StudentResponseDto>),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn get_student(
    State(service): State<Arc<StudentService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<StudentResponseDto>>> {
    let student = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(student), None)))
}

/// Create a student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = StudentPayloadDto,
    responses(
        (status = 201, description = "Student created", body = ApiResponse<StudentResponseDto>),
        (status = 400, description = "Validation error, or roll number/email already used")
    ),
    tag = "students"
)]
pub async fn create_student(
    State(service): State<Arc<StudentService>>,
    AppJson(dto): AppJson<StudentPayloadDto>,
) -> Result<(StatusCode, Json<ApiResponse<StudentResponseDto>>)> {
    let dto = dto.into_valid()?;
    let student = service.create(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(student),
            Some("Student created successfully".to_string()),
        )),
    ))
}

/// Replace a student
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = StudentPayloadDto,
    responses(
        (status = 200, description = "Student updated", body = ApiResponse<StudentResponseDto>),
        (status = 400, description = "Validation error, or roll number/email used by another student"),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn update_student(
    State(service): State<Arc<StudentService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<StudentPayloadDto>,
) -> Result<Json<ApiResponse<StudentResponseDto>>> {
    let dto = dto.into_valid()?;
    let student = service.update(id, dto).await?;

    Ok(Json(ApiResponse::success(
        Some(student),
        Some("Student updated successfully".to_string()),
    )))
}

/// Delete a student
///
/// Rejected while attendance records reference the student.
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 400, description = "Student has attendance records"),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn delete_student(
    State(service): State<Arc<StudentService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Student deleted successfully".to_string()),
    )))
}

/// Student attendance with statistics
#[utoipa::path(
    get,
    path = "/api/students/{id}/attendance",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student attendance and statistics", body = ApiResponse<StudentAttendanceDto>),
        (status = 404, description = "Student not found")
    ),
    tag = "students"
)]
pub async fn get_student_attendance(
    State(service): State<Arc<StudentService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<StudentAttendanceDto>>> {
    let view = service.attendance(id).await?;
    Ok(Json(ApiResponse::success(Some(view), None)))
}
