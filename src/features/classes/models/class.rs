use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for class
#[derive(Debug, Clone, FromRow)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub teacher: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
