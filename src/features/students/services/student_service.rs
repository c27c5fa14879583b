use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::attendance::dtos::{
    AttendanceFilter, AttendanceResponseDto, AttendanceStatisticsDto,
};
use crate::features::attendance::services::fetch_records;
use crate::features::students::dtos::{
    StudentAttendanceDto, StudentPayloadDto, StudentResponseDto,
};
use crate::features::students::models::Student;

pub const DUPLICATE_STUDENT_MESSAGE: &str =
    "Student with this roll number or email already exists";
pub const STUDENT_IN_USE_MESSAGE: &str = "Cannot delete student with existing attendance records";

const LIST_OPERATION: &str = "Error fetching students";
const GET_OPERATION: &str = "Error fetching student";
const CREATE_OPERATION: &str = "Error creating student";
const UPDATE_OPERATION: &str = "Error updating student";
const DELETE_OPERATION: &str = "Error deleting student";
const ATTENDANCE_OPERATION: &str = "Error fetching attendance statistics";

fn not_found() -> AppError {
    AppError::NotFound("Student not found".to_string())
}

/// Service for student records
pub struct StudentService {
    pool: PgPool,
}

impl StudentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all students, newest first
    pub async fn list(&self) -> Result<Vec<StudentResponseDto>> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, roll_number, class_label, email, created_at, updated_at
            FROM students
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::database(LIST_OPERATION))?;

        Ok(students.into_iter().map(|s| s.into()).collect())
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<StudentResponseDto> {
        self.find(id, GET_OPERATION)
            .await?
            .map(|s| s.into())
            .ok_or_else(not_found)
    }

    /// Create a student; roll number and email must be unused
    pub async fn create(&self, dto: StudentPayloadDto) -> Result<StudentResponseDto> {
        if self.identity_taken(&dto, None, CREATE_OPERATION).await? {
            return Err(AppError::Conflict(DUPLICATE_STUDENT_MESSAGE.to_string()));
        }

        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (id, name, roll_number, class_label, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, roll_number, class_label, email, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&dto.name)
        .bind(&dto.roll_number)
        .bind(&dto.class_label)
        .bind(&dto.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write_error(e, CREATE_OPERATION, DUPLICATE_STUDENT_MESSAGE))?;

        tracing::info!(
            "Student created: id={}, roll_number={}",
            student.id,
            student.roll_number
        );

        Ok(student.into())
    }

    /// Replace a student; roll number and email must not belong to another student
    pub async fn update(&self, id: Uuid, dto: StudentPayloadDto) -> Result<StudentResponseDto> {
        if self.identity_taken(&dto, Some(id), UPDATE_OPERATION).await? {
            return Err(AppError::Conflict(DUPLICATE_STUDENT_MESSAGE.to_string()));
        }

        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET name = $1, roll_number = $2, class_label = $3, email = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING id, name, roll_number, class_label, email, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.roll_number)
        .bind(&dto.class_label)
        .bind(&dto.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write_error(e, UPDATE_OPERATION, DUPLICATE_STUDENT_MESSAGE))?
        .ok_or_else(not_found)?;

        tracing::info!("Student updated: id={}", student.id);

        Ok(student.into())
    }

    /// Delete a student that has no attendance records
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let references = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM attendance WHERE student_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::database(DELETE_OPERATION))?;

        if references > 0 {
            return Err(AppError::Conflict(STUDENT_IN_USE_MESSAGE.to_string()));
        }

        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write_error(e, DELETE_OPERATION, STUDENT_IN_USE_MESSAGE))?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        tracing::info!("Student deleted: id={}", id);
        Ok(())
    }

    /// A student with all attendance marks (joined with class) and statistics
    pub async fn attendance(&self, id: Uuid) -> Result<StudentAttendanceDto> {
        let student = self
            .find(id, ATTENDANCE_OPERATION)
            .await?
            .ok_or_else(not_found)?;

        let records = fetch_records(&self.pool, &AttendanceFilter::for_student(id))
            .await
            .map_err(AppError::database(ATTENDANCE_OPERATION))?;

        let statistics = AttendanceStatisticsDto::from_statuses(records.iter().map(|r| r.status));

        Ok(StudentAttendanceDto {
            student: student.into(),
            attendance: records.into_iter().map(AttendanceResponseDto::from).collect(),
            statistics,
        })
    }

    async fn find(&self, id: Uuid, operation: &'static str) -> Result<Option<Student>> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, roll_number, class_label, email, created_at, updated_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::database(operation))
    }

    /// Whether another student already uses this roll number or email
    async fn identity_taken(
        &self,
        dto: &StudentPayloadDto,
        exclude: Option<Uuid>,
        operation: &'static str,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM students
                WHERE (roll_number = $1 OR email = $2)
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(&dto.roll_number)
        .bind(&dto.email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::database(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::attendance::dtos::AttendanceMark;
    use crate::features::attendance::models::AttendanceStatus;
    use crate::features::attendance::AttendanceService;
    use crate::features::classes::dtos::ClassPayloadDto;
    use crate::features::classes::ClassService;
    use crate::shared::test_helpers::{test_pool, unique_suffix};
    use chrono::NaiveDate;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn payload() -> StudentPayloadDto {
        let suffix = unique_suffix();
        StudentPayloadDto {
            name: Name().fake(),
            roll_number: format!("R-{}", suffix),
            class_label: "10-A".to_string(),
            email: format!("student{}@school.edu", suffix),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = StudentService::new(pool);

        let dto = payload();
        let created = service.create(dto.clone()).await.unwrap();
        let fetched = service.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched.roll_number, dto.roll_number);
        assert_eq!(fetched.email, dto.email);
        assert_eq!(fetched.class_label, "10-A");
    }

    #[tokio::test]
    async fn test_duplicate_roll_number_or_email_conflicts() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = StudentService::new(pool);

        let first = payload();
        service.create(first.clone()).await.unwrap();

        let same_roll = StudentPayloadDto {
            roll_number: first.roll_number.clone(),
            ..payload()
        };
        assert!(matches!(
            service.create(same_roll).await,
            Err(AppError::Conflict(ref m)) if m == DUPLICATE_STUDENT_MESSAGE
        ));

        let same_email = StudentPayloadDto {
            email: first.email.clone(),
            ..payload()
        };
        assert!(matches!(
            service.create(same_email).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_collision_and_self_update() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = StudentService::new(pool);

        let a = service.create(payload()).await.unwrap();
        let b = service.create(payload()).await.unwrap();

        let steal_email = StudentPayloadDto {
            name: b.name.clone(),
            roll_number: b.roll_number.clone(),
            class_label: b.class_label.clone(),
            email: a.email.clone(),
        };
        assert!(matches!(
            service.update(b.id, steal_email).await,
            Err(AppError::Conflict(_))
        ));

        let rename = StudentPayloadDto {
            name: "Renamed Student".to_string(),
            roll_number: b.roll_number.clone(),
            class_label: "11-B".to_string(),
            email: b.email.clone(),
        };
        let updated = service.update(b.id, rename).await.unwrap();
        assert_eq!(updated.name, "Renamed Student");
        assert_eq!(updated.class_label, "11-B");

        assert!(matches!(
            service.update(Uuid::now_v7(), payload()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_attendance() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = StudentService::new(pool.clone());

        let student = service.create(payload()).await.unwrap();
        let class = ClassService::new(pool.clone())
            .create(ClassPayloadDto {
                name: format!("Grade 9 {}", unique_suffix()),
                subject: "History".to_string(),
                teacher: "Ms. Khan".to_string(),
            })
            .await
            .unwrap();
        let attendance = AttendanceService::new(pool.clone());
        let mark = attendance
            .create(AttendanceMark {
                student_id: student.id,
                class_id: class.id,
                date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                status: AttendanceStatus::Late,
            })
            .await
            .unwrap();

        assert!(matches!(
            service.delete(student.id).await,
            Err(AppError::Conflict(ref m)) if m == STUDENT_IN_USE_MESSAGE
        ));

        let view = service.attendance(student.id).await.unwrap();
        assert_eq!(view.attendance.len(), 1);
        assert_eq!(view.attendance[0].class.name, class.name);
        assert_eq!(view.statistics.late, 1);
        assert_eq!(view.statistics.percentage, 100.0);

        attendance.delete(mark.id).await.unwrap();
        service.delete(student.id).await.unwrap();
        assert!(matches!(
            service.get_by_id(student.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_attendance_without_records_is_zero_percent() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = StudentService::new(pool);

        let student = service.create(payload()).await.unwrap();
        let view = service.attendance(student.id).await.unwrap();

        assert!(view.attendance.is_empty());
        assert_eq!(view.statistics.total, 0);
        assert_eq!(view.statistics.percentage, 0.0);
    }
}
