//! Uniform `{ error, details }` error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::domain::{DomainError, FieldErrors};

/// Error categories reported in the `error` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Validation,
    Authentication,
    NotFound,
    Duplicate,
    UnsupportedMediaType,
    Internal,
}

impl ApiErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation | Self::Duplicate => StatusCode::BAD_REQUEST,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation => "Validation error",
            Self::Authentication => "Authentication failed",
            Self::NotFound => "Not found",
            Self::Duplicate => "Duplicate entry",
            Self::UnsupportedMediaType => "Unsupported media type",
            Self::Internal => "Internal server error",
        }
    }
}

/// Serialized error body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub details: Value,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

const INTERNAL_DETAILS: &str = "An unexpected error occurred.";

impl ApiError {
    pub fn new(kind: ApiErrorKind, details: impl Into<Value>) -> Self {
        Self {
            status: kind.status(),
            response: ApiErrorResponse {
                error: kind.label().to_string(),
                details: details.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message.into())
    }

    /// Validation error carrying a field -> messages map
    pub fn fields(errors: &FieldErrors) -> Self {
        Self::new(
            ApiErrorKind::Validation,
            serde_json::to_value(errors).unwrap_or(Value::Null),
        )
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Authentication, message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Duplicate, message.into())
    }

    /// Internal error; the detail shown to clients is always generic
    pub fn internal() -> Self {
        Self::new(ApiErrorKind::Internal, INTERNAL_DETAILS)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::InvalidFields { errors } => Self::fields(&errors),
            DomainError::Conflict { message } => Self::duplicate(message),
            DomainError::Authentication { message } => Self::unauthorized(message),
            err @ (DomainError::Configuration { .. }
            | DomainError::Storage { .. }
            | DomainError::Internal { .. }) => {
                error!(error = %err, "Request failed");
                Self::internal()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.error, self.response.details)
    }
}

impl std::error::Error for ApiError {}
