//! Shared HTTP plumbing

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<T, ApiError>;

/// Map a domain error onto its HTTP status.
pub fn domain_error(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::UnresolvedRole(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Storage(_) | DomainError::Crypto(_) => {
            tracing::error!(error = %err, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::user_not_found(1), StatusCode::NOT_FOUND),
            (DomainError::UnresolvedRole("X".into()), StatusCode::BAD_REQUEST),
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, Json(body)) = domain_error(err);
            assert_eq!(status, expected);
            assert!(!body.success);
            assert!(body.error.is_some());
        }
    }

    #[test]
    fn test_error_envelope_omits_null_error_on_success() {
        let json = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 5}));
    }
}
