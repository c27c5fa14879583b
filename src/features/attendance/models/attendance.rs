use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Attendance status enum matching database enum
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "attendance_status")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Absent => write!(f, "Absent"),
            AttendanceStatus::Late => write!(f, "Late"),
        }
    }
}

/// Database model for an attendance mark
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Attendance {
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attendance mark joined with the student and class it references
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub student_name: String,
    pub student_roll_number: String,
    pub class_name: String,
    pub class_subject: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(AttendanceStatus::Late).unwrap(),
            serde_json::json!("Late")
        );
        let parsed: AttendanceStatus = serde_json::from_str("\"Absent\"").unwrap();
        assert_eq!(parsed, AttendanceStatus::Absent);
        assert!(serde_json::from_str::<AttendanceStatus>("\"present\"").is_err());
    }

    #[test]
    fn test_default_status_is_present() {
        assert_eq!(AttendanceStatus::default(), AttendanceStatus::Present);
    }
}
