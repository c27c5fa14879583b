use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items in `data` for list endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Raw error text for server-side failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
            count: None,
            error: None,
            errors: None,
        }
    }

    pub fn error(
        message: String,
        error: Option<String>,
        errors: Option<Vec<FieldError>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: Some(message),
            count: None,
            error,
            errors,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// List response carrying `count`
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::success(Some(items), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_sets_count_and_omits_empty_fields() {
        let value = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "success": true, "data": [1, 2, 3], "count": 3 })
        );
    }

    #[test]
    fn test_success_with_message_only() {
        let value = serde_json::to_value(ApiResponse::<()>::success(
            None,
            Some("Student deleted successfully".to_string()),
        ))
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "success": true, "message": "Student deleted successfully" })
        );
    }
}
