use utoipa::{Modify, OpenApi};

use crate::features::attendance::{
    dtos as attendance_dtos, handlers as attendance_handlers, models as attendance_models,
};
use crate::features::classes::{dtos as classes_dtos, handlers as classes_handlers};
use crate::features::students::{dtos as students_dtos, handlers as students_handlers};
use crate::shared::types::{ApiResponse, FieldError};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Students
        students_handlers::list_students,
        students_handlers::get_student,
        students_handlers::create_student,
        students_handlers::update_student,
        students_handlers::delete_student,
        students_handlers::get_student_attendance,
        // Classes
        classes_handlers::list_classes,
        classes_handlers::get_class,
        classes_handlers::create_class,
        classes_handlers::update_class,
        classes_handlers::delete_class,
        classes_handlers::get_class_attendance_summary,
        // Attendance
        attendance_handlers::list_attendance,
        attendance_handlers::get_attendance,
        attendance_handlers::create_attendance,
        attendance_handlers::update_attendance,
        attendance_handlers::delete_attendance,
        attendance_handlers::get_attendance_stats,
    ),
    components(
        schemas(
            FieldError,
            // Students
            students_dtos::StudentPayloadDto,
            students_dtos::StudentResponseDto,
            students_dtos::StudentAttendanceDto,
            // Classes
            classes_dtos::ClassPayloadDto,
            classes_dtos::ClassResponseDto,
            classes_dtos::ClassAttendanceSummaryDto,
            // Attendance
            attendance_models::AttendanceStatus,
            attendance_dtos::AttendancePayloadDto,
            attendance_dtos::AttendanceStudentDto,
            attendance_dtos::AttendanceClassDto,
            attendance_dtos::AttendanceResponseDto,
            attendance_dtos::AttendanceStatisticsDto,
            attendance_dtos::DailyTallyDto,
            // Response envelopes
            ApiResponse<students_dtos::StudentResponseDto>,
            ApiResponse<Vec<students_dtos::StudentResponseDto>>,
            ApiResponse<students_dtos::StudentAttendanceDto>,
            ApiResponse<classes_dtos::ClassResponseDto>,
            ApiResponse<Vec<classes_dtos::ClassResponseDto>>,
            ApiResponse<classes_dtos::ClassAttendanceSummaryDto>,
            ApiResponse<attendance_dtos::AttendanceResponseDto>,
            ApiResponse<Vec<attendance_dtos::AttendanceResponseDto>>,
            ApiResponse<attendance_dtos::AttendanceStatisticsDto>,
        )
    ),
    tags(
        (name = "students", description = "Student records and per-student attendance"),
        (name = "classes", description = "Classes and per-class attendance summaries"),
        (name = "attendance", description = "Daily attendance marks and statistics"),
    ),
    info(
        title = "Attendance Tracker API",
        version = "0.1.0",
        description = "API documentation for the attendance tracker",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
