use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform response envelope: `{ success, data, message? }`.
///
/// `data` is always present. Failures carry `null` for single-entity endpoints
/// and `[]` for list endpoints so the field keeps its type.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>, data: T) -> Self {
        Self {
            success: false,
            data,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_omits_message() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": [1, 2] }));
    }

    #[test]
    fn test_failure_envelope_keeps_data_shape() {
        let list = serde_json::to_value(ApiResponse::<Vec<()>>::failure("boom", Vec::new())).unwrap();
        assert_eq!(list["data"], serde_json::json!([]));

        let item = serde_json::to_value(ApiResponse::<Option<()>>::failure("boom", None)).unwrap();
        assert!(item["data"].is_null());
        assert_eq!(item["message"], "boom");
        assert_eq!(item["success"], false);
    }
}
