use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::store::ServiceError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `UNAUTHENTICATED`, `INVALID_CREDENTIALS`,
    /// `VALIDATION_ERROR`, `NOT_FOUND`, `CONFLICT`, `FORBIDDEN`, `INVALID_STATE`,
    /// `UNAVAILABLE`, `TIMEOUT`, `INTERNAL_ERROR`.
    #[schema(example = "CONFLICT")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Grievance has already been claimed")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InvalidState(String),
    Unavailable(String),
    Timeout,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            // Missing and invalid tokens are indistinguishable to the client.
            AppError::TokenMissing | AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Missing, invalid or expired token".into(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid mobile number or password".into(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg),
            AppError::Unavailable(detail) => {
                tracing::warn!("Store unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UNAVAILABLE",
                    "Service temporarily unavailable".into(),
                )
            }
            AppError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "The request took too long to complete".into(),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                )
            }
        };

        (status, ErrorBody { code, message })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthenticated => AppError::TokenInvalid,
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ServiceError::InvalidState(msg) => AppError::InvalidState(msg),
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Unavailable(msg) => AppError::Unavailable(msg),
            ServiceError::Timeout(_) => AppError::Timeout,
            ServiceError::Storage(common::storage::StorageError::SizeLimitExceeded {
                limit,
                ..
            }) => AppError::Validation(format!("Photo exceeds maximum size of {limit} bytes")),
            ServiceError::Storage(common::storage::StorageError::NotFound(_)) => {
                AppError::NotFound("Photo not found".into())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}
