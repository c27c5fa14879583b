use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::shared::types::{ApiResponse, FieldError};
use crate::shared::validation::to_field_errors;

/// PostgreSQL `unique_violation`
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL `foreign_key_violation`
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Operation reported when a database error reaches a handler without context
const UNNAMED_DATABASE_OPERATION: &str = "Database error occurred";

#[derive(Debug, Error)]
pub enum AppError {
    /// Database failure during `operation`, e.g. "Error creating student"
    #[error("{operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation errors")]
    Validation(Vec<FieldError>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Uniqueness or referential conflict. Rendered as 400.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// `map_err` adapter that tags a database error with the failed operation
    pub fn database(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| AppError::Database { operation, source }
    }

    /// Map constraint violations raised by a write into a conflict carrying
    /// `conflict_message`. Every other database error is reported under
    /// `operation`.
    pub fn from_write_error(
        e: sqlx::Error,
        operation: &'static str,
        conflict_message: &str,
    ) -> Self {
        if let Some(code) = constraint_violation(&e) {
            tracing::warn!("Constraint violation ({}) during: {}", code, operation);
            return AppError::Conflict(conflict_message.to_string());
        }

        AppError::Database {
            operation,
            source: e,
        }
    }

    /// Whether a write failed because a referenced row does not exist
    pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
        constraint_violation(e) == Some(PG_FOREIGN_KEY_VIOLATION)
    }
}

/// The SQLSTATE of a unique or foreign-key violation, if `e` is one
fn constraint_violation(e: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db_err) = e else {
        return None;
    };
    match &*db_err.code()? {
        PG_UNIQUE_VIOLATION => Some(PG_UNIQUE_VIOLATION),
        PG_FOREIGN_KEY_VIOLATION => Some(PG_FOREIGN_KEY_VIOLATION),
        _ => None,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(source: sqlx::Error) -> Self {
        AppError::Database {
            operation: UNNAMED_DATABASE_OPERATION,
            source,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(to_field_errors(&errors, &[]))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database { operation, source } => {
                tracing::error!("{}: {:?}", operation, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error(
                        operation.to_string(),
                        Some(source.to_string()),
                        None,
                    ),
                )
            }
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiResponse::<()>::error(msg, None, None),
            ),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::error("Validation errors".to_string(), None, Some(errors)),
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::error(msg, None, None),
            ),
            AppError::Conflict(msg) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::error(msg, None, None),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error("Internal server error".to_string(), Some(msg), None),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
