use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for student
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub class_label: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
