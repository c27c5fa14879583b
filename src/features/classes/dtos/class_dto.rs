use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::features::attendance::dtos::{
    AttendanceResponseDto, AttendanceStatisticsDto, DailyTallyDto,
};
use crate::features::classes::models::Class;
use crate::shared::validation::null_as_empty;

/// Request DTO for creating or replacing a class.
///
/// Missing or `null` fields become empty strings and fail validation.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct ClassPayloadDto {
    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 2, message = "Class name must be at least 2 characters long"))]
    pub name: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,

    #[serde(deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "Teacher name is required"))]
    pub teacher: String,
}

impl ClassPayloadDto {
    /// Trim, then validate
    pub fn into_valid(self) -> Result<Self> {
        let dto = Self {
            name: self.name.trim().to_string(),
            subject: self.subject.trim().to_string(),
            teacher: self.teacher.trim().to_string(),
        };
        dto.validate()?;
        Ok(dto)
    }
}

/// Response DTO for class
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponseDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub teacher: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Class> for ClassResponseDto {
    fn from(c: Class) -> Self {
        Self {
            id: c.id,
            name: c.name,
            subject: c.subject,
            teacher: c.teacher,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// A class with every attendance mark, overall summary and per-day tallies
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassAttendanceSummaryDto {
    pub class: ClassResponseDto,
    pub attendance: Vec<AttendanceResponseDto>,
    pub summary: AttendanceStatisticsDto,
    /// Keyed by `YYYY-MM-DD`
    pub daily_summary: BTreeMap<String, DailyTallyDto>,
}
