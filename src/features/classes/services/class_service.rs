use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::attendance::dtos::{
    AttendanceFilter, AttendanceResponseDto, AttendanceStatisticsDto, DailyTallyDto,
};
use crate::features::attendance::services::fetch_records;
use crate::features::classes::dtos::{
    ClassAttendanceSummaryDto, ClassPayloadDto, ClassResponseDto,
};
use crate::features::classes::models::Class;

pub const DUPLICATE_CLASS_MESSAGE: &str = "Class with this name and subject already exists";
pub const CLASS_IN_USE_MESSAGE: &str = "Cannot delete class with existing attendance records";

const LIST_OPERATION: &str = "Error fetching classes";
const GET_OPERATION: &str = "Error fetching class";
const CREATE_OPERATION: &str = "Error creating class";
const UPDATE_OPERATION: &str = "Error updating class";
const DELETE_OPERATION: &str = "Error deleting class";
const SUMMARY_OPERATION: &str = "Error fetching attendance summary";

fn not_found() -> AppError {
    AppError::NotFound("Class not found".to_string())
}

/// Service for classes and per-class attendance summaries
pub struct ClassService {
    pool: PgPool,
}

impl ClassService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all classes, newest first
    pub async fn list(&self) -> Result<Vec<ClassResponseDto>> {
        let classes = sqlx::query_as::<_, Class>(
            r#"
            SELECT id, name, subject, teacher, created_at, updated_at
            FROM classes
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::database(LIST_OPERATION))?;

        Ok(classes.into_iter().map(|c| c.into()).collect())
    }

    /// Get class by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<ClassResponseDto> {
        self.find(id, GET_OPERATION)
            .await?
            .map(|c| c.into())
            .ok_or_else(not_found)
    }

    /// Create a class; the (name, subject) pair must be unused
    pub async fn create(&self, dto: ClassPayloadDto) -> Result<ClassResponseDto> {
        if self.pair_taken(&dto, None, CREATE_OPERATION).await? {
            return Err(AppError::Conflict(DUPLICATE_CLASS_MESSAGE.to_string()));
        }

        let class = sqlx::query_as::<_, Class>(
            r#"
            INSERT INTO classes (id, name, subject, teacher)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, subject, teacher, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&dto.name)
        .bind(&dto.subject)
        .bind(&dto.teacher)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write_error(e, CREATE_OPERATION, DUPLICATE_CLASS_MESSAGE))?;

        tracing::info!(
            "Class created: id={}, name={}, subject={}",
            class.id,
            class.name,
            class.subject
        );

        Ok(class.into())
    }

    /// Replace a class; the (name, subject) pair must not belong to another class
    pub async fn update(&self, id: Uuid, dto: ClassPayloadDto) -> Result<ClassResponseDto> {
        if self.pair_taken(&dto, Some(id), UPDATE_OPERATION).await? {
            return Err(AppError::Conflict(DUPLICATE_CLASS_MESSAGE.to_string()));
        }

        let class = sqlx::query_as::<_, Class>(
            r#"
            UPDATE classes
            SET name = $1, subject = $2, teacher = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, subject, teacher, created_at, updated_at
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.subject)
        .bind(&dto.teacher)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write_error(e, UPDATE_OPERATION, DUPLICATE_CLASS_MESSAGE))?
        .ok_or_else(not_found)?;

        tracing::info!("Class updated: id={}", class.id);

        Ok(class.into())
    }

    /// Delete a class that has no attendance records
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let references =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE class_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::database(DELETE_OPERATION))?;

        if references > 0 {
            return Err(AppError::Conflict(CLASS_IN_USE_MESSAGE.to_string()));
        }

        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_write_error(e, DELETE_OPERATION, CLASS_IN_USE_MESSAGE))?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        tracing::info!("Class deleted: id={}", id);
        Ok(())
    }

    /// A class with all attendance marks (joined with student), the overall
    /// summary and per-day tallies
    pub async fn attendance_summary(&self, id: Uuid) -> Result<ClassAttendanceSummaryDto> {
        let class = self
            .find(id, SUMMARY_OPERATION)
            .await?
            .ok_or_else(not_found)?;

        let records = fetch_records(&self.pool, &AttendanceFilter::for_class(id))
            .await
            .map_err(AppError::database(SUMMARY_OPERATION))?;

        let summary = AttendanceStatisticsDto::from_statuses(records.iter().map(|r| r.status));
        let daily_summary =
            DailyTallyDto::bucket_by_date(records.iter().map(|r| (r.date, r.status)));

        Ok(ClassAttendanceSummaryDto {
            class: class.into(),
            attendance: records.into_iter().map(AttendanceResponseDto::from).collect(),
            summary,
            daily_summary,
        })
    }

    async fn find(&self, id: Uuid, operation: &'static str) -> Result<Option<Class>> {
        sqlx::query_as::<_, Class>(
            r#"
            SELECT id, name, subject, teacher, created_at, updated_at
            FROM classes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::database(operation))
    }

    /// Whether another class already uses this (name, subject) pair
    async fn pair_taken(
        &self,
        dto: &ClassPayloadDto,
        exclude: Option<Uuid>,
        operation: &'static str,
    ) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM classes
                WHERE name = $1 AND subject = $2
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.subject)
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
    use crate::features::students::dtos::StudentPayloadDto;
    use crate::features::students::StudentService;
    use crate::shared::test_helpers::{test_pool, unique_suffix};
    use chrono::NaiveDate;

    fn payload(subject: &str) -> ClassPayloadDto {
        ClassPayloadDto {
            name: format!("Grade 10 {}", unique_suffix()),
            subject: subject.to_string(),
            teacher: "Mrs. Das".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_pair_conflicts_but_same_name_other_subject_is_fine() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = ClassService::new(pool);

        let first = service.create(payload("Maths")).await.unwrap();

        let same_pair = ClassPayloadDto {
            name: first.name.clone(),
            subject: "Maths".to_string(),
            teacher: "Someone Else".to_string(),
        };
        assert!(matches!(
            service.create(same_pair).await,
            Err(AppError::Conflict(ref m)) if m == DUPLICATE_CLASS_MESSAGE
        ));

        let other_subject = ClassPayloadDto {
            name: first.name.clone(),
            subject: "Chemistry".to_string(),
            teacher: "Mrs. Das".to_string(),
        };
        service.create(other_subject).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_to_other_pair_conflicts_and_own_pair_succeeds() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = ClassService::new(pool);

        let a = service.create(payload("Biology")).await.unwrap();
        let b = service.create(payload("Biology")).await.unwrap();

        let take_a = ClassPayloadDto {
            name: a.name.clone(),
            subject: a.subject.clone(),
            teacher: b.teacher.clone(),
        };
        assert!(matches!(
            service.update(b.id, take_a).await,
            Err(AppError::Conflict(_))
        ));

        let keep_own = ClassPayloadDto {
            name: b.name.clone(),
            subject: b.subject.clone(),
            teacher: "Mr. Menon".to_string(),
        };
        let updated = service.update(b.id, keep_own).await.unwrap();
        assert_eq!(updated.teacher, "Mr. Menon");
    }

    #[tokio::test]
    async fn test_summary_buckets_by_day_and_blocks_delete() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = ClassService::new(pool.clone());
        let students = StudentService::new(pool.clone());
        let attendance = AttendanceService::new(pool.clone());

        let class = service.create(payload("Geography")).await.unwrap();

        let mut student_ids = Vec::new();
        for _ in 0..2 {
            let suffix = unique_suffix();
            let student = students
                .create(StudentPayloadDto {
                    name: "Ravi Kumar".to_string(),
                    roll_number: format!("R-{}", suffix),
                    class_label: "10-B".to_string(),
                    email: format!("ravi{}@school.edu", suffix),
                })
                .await
                .unwrap();
            student_ids.push(student.id);
        }

        let day = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2025, 2, 4).unwrap();
        for (student_id, date, status) in [
            (student_ids[0], day, AttendanceStatus::Present),
            (student_ids[1], day, AttendanceStatus::Absent),
            (student_ids[0], next_day, AttendanceStatus::Late),
        ] {
            attendance
                .create(AttendanceMark {
                    student_id,
                    class_id: class.id,
                    date,
                    status,
                })
                .await
                .unwrap();
        }

        let summary = service.attendance_summary(class.id).await.unwrap();
        assert_eq!(summary.attendance.len(), 3);
        assert_eq!(summary.attendance[0].date, next_day);
        assert_eq!(summary.summary, AttendanceStatisticsDto::from_counts(1, 1, 1));
        assert_eq!(summary.summary.percentage, 66.67);

        let first_day = summary.daily_summary["2025-02-03"];
        assert_eq!((first_day.present, first_day.absent, first_day.total), (1, 1, 2));
        assert_eq!(summary.daily_summary["2025-02-04"].late, 1);

        assert!(matches!(
            service.delete(class.id).await,
            Err(AppError::Conflict(ref m)) if m == CLASS_IN_USE_MESSAGE
        ));
    }

    #[tokio::test]
    async fn test_delete_unreferenced_class() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let service = ClassService::new(pool);

        let class = service.create(payload("Art")).await.unwrap();
        service.delete(class.id).await.unwrap();

        assert!(matches!(
            service.get_by_id(class.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.attendance_summary(class.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
