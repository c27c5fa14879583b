use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::attendance::dtos::{
    AttendanceFilter, AttendanceMark, AttendanceResponseDto, AttendanceStatisticsDto,
};
use crate::features::attendance::models::{Attendance, AttendanceRecord, AttendanceStatus};

pub const DUPLICATE_ATTENDANCE_MESSAGE: &str =
    "Attendance already marked for this student, class and date";

const REFERENCES_MISSING_MESSAGE: &str = "Student or class not found";

const LIST_OPERATION: &str = "Error fetching attendance";
const GET_OPERATION: &str = "Error fetching attendance record";
const CREATE_OPERATION: &str = "Error marking attendance";
const UPDATE_OPERATION: &str = "Error updating attendance";
const DELETE_OPERATION: &str = "Error deleting attendance";
const STATS_OPERATION: &str = "Error fetching attendance statistics";

const RECORD_SELECT: &str = r#"
    SELECT a.id, a.student_id, a.class_id, a.date, a.status, a.created_at, a.updated_at,
           s.name AS student_name, s.roll_number AS student_roll_number,
           c.name AS class_name, c.subject AS class_subject
    FROM attendance a
    JOIN students s ON s.id = a.student_id
    JOIN classes c ON c.id = a.class_id
"#;

/// Optional filters over alias `a`, bound as $1..$5 in `AttendanceFilter` field order
const FILTER_WHERE: &str = r#"
    WHERE ($1::uuid IS NULL OR a.student_id = $1)
      AND ($2::uuid IS NULL OR a.class_id = $2)
      AND ($3::attendance_status IS NULL OR a.status = $3)
      AND ($4::date IS NULL OR a.date >= $4)
      AND ($5::date IS NULL OR a.date <= $5)
"#;

/// Fetch joined attendance records, newest date first.
///
/// Shared with the student and class features for their per-entity views.
pub async fn fetch_records(
    pool: &PgPool,
    filter: &AttendanceFilter,
) -> std::result::Result<Vec<AttendanceRecord>, sqlx::Error> {
    let query = format!(
        "{} {} ORDER BY a.date DESC, a.created_at DESC",
        RECORD_SELECT, FILTER_WHERE
    );

    sqlx::query_as::<_, AttendanceRecord>(&query)
        .bind(filter.student_id)
        .bind(filter.class_id)
        .bind(filter.status)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(pool)
        .await
}

/// Service for attendance marks and global statistics
pub struct AttendanceService {
    pool: PgPool,
}

impl AttendanceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List attendance records matching the filter
    pub async fn list(&self, filter: AttendanceFilter) -> Result<Vec<AttendanceResponseDto>> {
        filter.validate_range()?;

        let records = fetch_records(&self.pool, &filter)
            .await
            .map_err(AppError::database(LIST_OPERATION))?;

        Ok(records.into_iter().map(AttendanceResponseDto::from).collect())
    }

    /// Get a single attendance record by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<AttendanceResponseDto> {
        let query = format!("{} WHERE a.id = $1", RECORD_SELECT);
        let record = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::database(GET_OPERATION))?;

        record
            .map(AttendanceResponseDto::from)
            .ok_or_else(|| AppError::NotFound("Attendance record not found".to_string()))
    }

    /// Mark attendance for a student in a class on a date
    pub async fn create(&self, mark: AttendanceMark) -> Result<AttendanceResponseDto> {
        self.ensure_references_exist(&mark, CREATE_OPERATION).await?;

        if self.duplicate_exists(&mark, None, CREATE_OPERATION).await? {
            return Err(AppError::Conflict(DUPLICATE_ATTENDANCE_MESSAGE.to_string()));
        }

        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance (id, student_id, class_id, date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, student_id, class_id, date, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(mark.student_id)
        .bind(mark.class_id)
        .bind(mark.date)
        .bind(mark.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, CREATE_OPERATION))?;

        tracing::info!(
            "Attendance marked: id={}, student={}, class={}, date={}, status={}",
            attendance.id,
            attendance.student_id,
            attendance.class_id,
            attendance.date,
            attendance.status
        );

        self.get_by_id(attendance.id).await
    }

    /// Replace an attendance record
    pub async fn update(&self, id: Uuid, mark: AttendanceMark) -> Result<AttendanceResponseDto> {
        self.ensure_references_exist(&mark, UPDATE_OPERATION).await?;

        if self.duplicate_exists(&mark, Some(id), UPDATE_OPERATION).await? {
            return Err(AppError::Conflict(DUPLICATE_ATTENDANCE_MESSAGE.to_string()));
        }

        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            UPDATE attendance
            SET student_id = $1, class_id = $2, date = $3, status = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, student_id, class_id, date, status, created_at, updated_at
            "#,
        )
        .bind(mark.student_id)
        .bind(mark.class_id)
        .bind(mark.date)
        .bind(mark.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, UPDATE_OPERATION))?
        .ok_or_else(|| AppError::NotFound("Attendance record not found".to_string()))?;

        tracing::info!(
            "Attendance updated: id={}, status={}",
            attendance.id,
            attendance.status
        );

        self.get_by_id(attendance.id).await
    }

    /// Delete an attendance record
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database(DELETE_OPERATION))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Attendance record not found".to_string()));
        }

        tracing::info!("Attendance deleted: id={}", id);
        Ok(())
    }

    /// Status counts and percentage over all matching records
    pub async fn stats(&self, filter: AttendanceFilter) -> Result<AttendanceStatisticsDto> {
        filter.validate_range()?;

        let query = format!(
            "SELECT a.status, COUNT(*) AS count FROM attendance a {} GROUP BY a.status",
            FILTER_WHERE
        );

        let rows = sqlx::query_as::<_, (AttendanceStatus, i64)>(&query)
            .bind(filter.student_id)
            .bind(filter.class_id)
            .bind(filter.status)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database(STATS_OPERATION))?;

        let (mut present, mut absent, mut late) = (0, 0, 0);
        for (status, count) in rows {
            match status {
                AttendanceStatus::Present => present = count,
                AttendanceStatus::Absent => absent = count,
                AttendanceStatus::Late => late = count,
            }
        }

        Ok(AttendanceStatisticsDto::from_counts(present, absent, late))
    }

    async fn ensure_references_exist(
        &self,
        mark: &AttendanceMark,
        operation: &'static str,
    ) -> Result<()> {
        let (student_exists, class_exists): (bool, bool) = sqlx::query_as(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM students WHERE id = $1),
                EXISTS(SELECT 1 FROM classes WHERE id = $2)
            "#,
        )
        .bind(mark.student_id)
        .bind(mark.class_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::database(operation))?;

        if !student_exists {
            return Err(AppError::NotFound("Student not found".to_string()));
        }
        if !class_exists {
            return Err(AppError::NotFound("Class not found".to_string()));
        }
        Ok(())
    }

    async fn duplicate_exists(
        &self,
        mark: &AttendanceMark,
        exclude: Option<Uuid>,
        operation: &'static str,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM attendance
                WHERE student_id = $1 AND class_id = $2 AND date = $3
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(mark.student_id)
        .bind(mark.class_id)
        .bind(mark.date)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::database(operation))
    }
}

/// A student or class deleted between the existence check and the write
/// fails the foreign key, which is a missing reference rather than a duplicate.
fn map_write_error(e: sqlx::Error, operation: &'static str) -> AppError {
    if AppError::is_foreign_key_violation(&e) {
        return AppError::NotFound(REFERENCES_MISSING_MESSAGE.to_string());
    }
    AppError::from_write_error(e, operation, DUPLICATE_ATTENDANCE_MESSAGE)
}
