use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::attendance::dtos::{AttendanceResponseDto, AttendanceStatisticsDto};
use crate::features::students::models::Student;
use crate::shared::validation::{null_as_empty, to_field_errors, EMAIL_REGEX};

/// Request DTO for creating or replacing a student.
///
/// Missing or `null` fields deserialize as empty strings so they surface as
/// field validation errors rather than JSON errors.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct StudentPayloadDto {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 2, message = "Name must be at least 2 characters long"))]
    pub name: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Roll number is required"))]
    pub roll_number: String,

    /// Free-text class label, e.g. "10-A"
    #[serde(rename = "class", deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Class is required"))]
    pub class_label: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(regex(path = *EMAIL_REGEX, message = "Please enter a valid email"))]
    pub email: String,
}

impl StudentPayloadDto {
    /// Trim every field and lowercase the email
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            roll_number: self.roll_number.trim().to_string(),
            class_label: self.class_label.trim().to_string(),
            email: self.email.trim().to_lowercase(),
        }
    }

    /// Normalize, then validate
    pub fn into_valid(self) -> Result<Self> {
        let dto = self.normalized();
        dto.validate()
            .map_err(|e| AppError::Validation(to_field_errors(&e, &[("class_label", "class")])))?;
        Ok(dto)
    }
}

/// Response DTO for student
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponseDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    #[serde(rename = "class")]
    pub class_label: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Student> for StudentResponseDto {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            name: s.name,
            roll_number: s.roll_number,
            class_label: s.class_label,
            email: s.email,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// A student together with every attendance mark and the derived statistics
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentAttendanceDto {
    pub student: StudentResponseDto,
    pub attendance: Vec<AttendanceResponseDto>,
    pub statistics: AttendanceStatisticsDto,
}
