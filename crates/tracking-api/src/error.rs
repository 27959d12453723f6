//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps issuance and store errors to HTTP status codes and JSON bodies
//! with an error code, a message, and optional details.
//! Internal error details are never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracking_core::ValidationErrors;
use utoipa::ToSchema;

use crate::orchestration::IssuanceError;
use crate::store::StoreError;

/// Structured JSON error response body.
///
/// The `details` field carries the per-field messages of a failed
/// validation and is omitted everywhere else.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field name to message, present only for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// One or more request fields failed validation (422).
    #[error("validation error: {0}")]
    Validation(ValidationErrors),

    /// Request could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (message, details) = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                ("An internal error occurred".to_string(), None)
            }
            Self::Validation(errors) => (
                "request validation failed".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            other => (other.to_string(), None),
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<IssuanceError> for AppError {
    fn from(err: IssuanceError) -> Self {
        match err {
            IssuanceError::Invalid(errors) => Self::Validation(errors),
            IssuanceError::Conflict(tracking_number) => {
                Self::Conflict(format!("tracking number {tracking_number} already issued"))
            }
            IssuanceError::Store(err) => Self::from(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { tracking_number } => {
                Self::Conflict(format!("tracking number {tracking_number} already issued"))
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracking_core::{Field, TrackingNumber};

    fn weight_and_name_errors() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.insert(Field::Weight, "weight must be a number");
        errors.insert(Field::CustomerName, "customer_name must not be empty");
        errors
    }

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("TR404".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation(weight_and_name_errors());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn conflict_status_code() {
        let err = AppError::Conflict("taken".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "CONFLICT");
    }

    #[test]
    fn issuance_errors_map_to_statuses() {
        let tn = TrackingNumber::parse("TR1700000000AAAA").unwrap();
        let cases = [
            (
                AppError::from(IssuanceError::Invalid(weight_and_name_errors())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(IssuanceError::Conflict(tn)),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(IssuanceError::Store(StoreError::NumericOverflow {
                    column: "weight",
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_and_code().0, expected, "{err}");
        }
    }

    #[test]
    fn error_body_serializes_without_details() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("TEST"));
        assert!(!json.contains("details")); // skipped when None
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_validation_carries_field_map() {
        let (status, body) = response_parts(AppError::Validation(weight_and_name_errors())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        assert_eq!(
            body.error.details,
            Some(serde_json::json!({
                "weight": "weight must be a number",
                "customer_name": "customer_name must not be empty",
            }))
        );
    }

    #[tokio::test]
    async fn into_response_conflict() {
        let tn = TrackingNumber::parse("TR1700000000AAAA").unwrap();
        let (status, body) = response_parts(AppError::from(IssuanceError::Conflict(tn))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.error.message.contains("TR1700000000AAAA"));
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let err = AppError::from(StoreError::ValueTooLong {
            column: "customer_name",
            max: 255,
        });
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_bad_request() {
        let (status, body) = response_parts(AppError::BadRequest("malformed".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.message.contains("malformed"));
    }
}
