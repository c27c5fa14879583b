use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::attendance::models::{AttendanceRecord, AttendanceStatus};

/// Request DTO for marking or replacing an attendance record
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePayloadDto {
    #[validate(required(message = "Student ID is required"))]
    pub student_id: Option<Uuid>,

    #[validate(required(message = "Class ID is required"))]
    pub class_id: Option<Uuid>,

    /// `YYYY-MM-DD` or an RFC 3339 timestamp (reduced to its UTC date).
    /// Defaults to today.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, format = Date, example = "2025-03-10")]
    pub date: Option<NaiveDate>,

    /// Defaults to `Present`
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
}

/// A validated attendance mark with defaults applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceMark {
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendancePayloadDto {
    /// Validate and fill in the default date and status
    pub fn into_mark(self, today: NaiveDate) -> Result<AttendanceMark> {
        self.validate()?;

        let (Some(student_id), Some(class_id)) = (self.student_id, self.class_id) else {
            return Err(AppError::BadRequest(
                "studentId and classId are required".to_string(),
            ));
        };

        Ok(AttendanceMark {
            student_id,
            class_id,
            date: self.date.unwrap_or(today),
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_attendance_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| {
            format!(
                "Invalid date '{}': expected YYYY-MM-DD or an RFC 3339 timestamp",
                raw
            )
        })
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_attendance_date(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Student fields embedded in an attendance response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStudentDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
}

/// Class fields embedded in an attendance response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceClassDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub subject: String,
}

/// Response DTO for an attendance record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponseDto {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub student: AttendanceStudentDto,
    pub class: AttendanceClassDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AttendanceRecord> for AttendanceResponseDto {
    fn from(r: AttendanceRecord) -> Self {
        Self {
            id: r.id,
            student_id: r.student_id,
            class_id: r.class_id,
            date: r.date,
            status: r.status,
            student: AttendanceStudentDto {
                id: r.student_id,
                name: r.student_name,
                roll_number: r.student_roll_number,
            },
            class: AttendanceClassDto {
                id: r.class_id,
                name: r.class_name,
                subject: r.class_subject,
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Query params for listing attendance records
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQueryParams {
    /// Only records for this student
    pub student_id: Option<Uuid>,
    /// Only records for this class
    pub class_id: Option<Uuid>,
    /// Only records with this status
    pub status: Option<AttendanceStatus>,
    /// Earliest date, inclusive (YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    /// Latest date, inclusive (YYYY-MM-DD)
    pub to: Option<NaiveDate>,
}

/// Query params for the attendance statistics endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceStatsQueryParams {
    pub student_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Row filter shared by listing, statistics and the per-student and
/// per-class views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub student_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub status: Option<AttendanceStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn for_student(student_id: Uuid) -> Self {
        Self {
            student_id: Some(student_id),
            ..Self::default()
        }
    }

    pub fn for_class(class_id: Uuid) -> Self {
        Self {
            class_id: Some(class_id),
            ..Self::default()
        }
    }

    /// Reject an inverted date range
    pub fn validate_range(&self) -> Result<()> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(AppError::BadRequest(format!(
                "'from' ({}) must not be after 'to' ({})",
                from, to
            ))),
            _ => Ok(()),
        }
    }
}

impl From<AttendanceQueryParams> for AttendanceFilter {
    fn from(q: AttendanceQueryParams) -> Self {
        Self {
            student_id: q.student_id,
            class_id: q.class_id,
            status: q.status,
            from: q.from,
            to: q.to,
        }
    }
}

impl From<AttendanceStatsQueryParams> for AttendanceFilter {
    fn from(q: AttendanceStatsQueryParams) -> Self {
        Self {
            student_id: q.student_id,
            class_id: q.class_id,
            status: None,
            from: q.from,
            to: q.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_attendance_date("2025-03-10"), Ok(date("2025-03-10")));
    }

    #[test]
    fn test_parse_timestamp_uses_utc_date() {
        assert_eq!(
            parse_attendance_date("2025-03-10T23:30:00-02:00"),
            Ok(date("2025-03-11"))
        );
        assert_eq!(
            parse_attendance_date("2025-03-10T08:15:00.000Z"),
            Ok(date("2025-03-10"))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_attendance_date("10/03/2025").is_err());
        assert!(parse_attendance_date("yesterday").is_err());
    }

    #[test]
    fn test_payload_defaults() {
        let student_id = Uuid::now_v7();
        let class_id = Uuid::now_v7();
        let dto: AttendancePayloadDto = serde_json::from_value(json!({
            "studentId": student_id,
            "classId": class_id,
        }))
        .unwrap();

        let mark = dto.into_mark(date("2025-04-01")).unwrap();
        assert_eq!(
            mark,
            AttendanceMark {
                student_id,
                class_id,
                date: date("2025-04-01"),
                status: AttendanceStatus::Present,
            }
        );
    }

    #[test]
    fn test_payload_explicit_values() {
        let dto: AttendancePayloadDto = serde_json::from_value(json!({
            "studentId": Uuid::now_v7(),
            "classId": Uuid::now_v7(),
            "date": "2025-02-14T09:00:00Z",
            "status": "Late",
        }))
        .unwrap();

        let mark = dto.into_mark(date("2025-04-01")).unwrap();
        assert_eq!(mark.date, date("2025-02-14"));
        assert_eq!(mark.status, AttendanceStatus::Late);
    }

    #[test]
    fn test_payload_missing_references_is_validation_error() {
        let dto: AttendancePayloadDto = serde_json::from_value(json!({})).unwrap();

        match dto.into_mark(date("2025-04-01")) {
            Err(AppError::Validation(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["classId", "studentId"]);
                assert_eq!(errors[1].message, "Student ID is required");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_rejects_unknown_status() {
        let result = serde_json::from_value::<AttendancePayloadDto>(json!({
            "studentId": Uuid::now_v7(),
            "classId": Uuid::now_v7(),
            "status": "Excused",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_range_validation() {
        let filter = AttendanceFilter {
            from: Some(date("2025-03-10")),
            to: Some(date("2025-03-01")),
            ..AttendanceFilter::default()
        };
        assert!(matches!(filter.validate_range(), Err(AppError::BadRequest(_))));

        let same_day = AttendanceFilter {
            from: Some(date("2025-03-10")),
            to: Some(date("2025-03-10")),
            ..AttendanceFilter::default()
        };
        assert!(same_day.validate_range().is_ok());
    }

    #[test]
    fn test_response_serializes_underscore_ids() {
        let now = Utc::now();
        let (id, student_id, class_id) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        let value = serde_json::to_value(AttendanceResponseDto::from(AttendanceRecord {
            id,
            student_id,
            class_id,
            date: date("2025-03-10"),
            status: AttendanceStatus::Late,
            created_at: now,
            updated_at: now,
            student_name: "Asha Rao".to_string(),
            student_roll_number: "R-001".to_string(),
            class_name: "Grade 10".to_string(),
            class_subject: "Physics".to_string(),
        }))
        .unwrap();

        assert_eq!(value["_id"], id.to_string());
        assert!(value.get("id").is_none());
        assert_eq!(value["studentId"], student_id.to_string());
        assert_eq!(value["classId"], class_id.to_string());
        assert_eq!(value["student"]["_id"], student_id.to_string());
        assert_eq!(value["class"]["_id"], class_id.to_string());
        assert_eq!(value["date"], "2025-03-10");
        assert_eq!(value["status"], "Late");
    }
}
