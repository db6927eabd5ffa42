//! Error responses for the audit API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// API error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed request body error.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// A 500 response.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::new("INTERNAL_ERROR", message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<AuditError> for ApiErrorResponse {
    fn from(error: AuditError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            AuditError::MissingSheet { sheet } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "MISSING_SHEET",
                    message,
                    format!("The workbook must contain a sheet named '{}'", sheet),
                ),
            ),
            AuditError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PERIOD", message),
            ),
            AuditError::WorkbookRead { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("WORKBOOK_READ_ERROR", message),
            ),
            AuditError::ConfigNotFound { .. } | AuditError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            AuditError::Unauthorized { .. } => {
                (StatusCode::UNAUTHORIZED, ApiError::new("UNAUTHORIZED", message))
            }
            AuditError::Cancelled => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "CANCELLED",
                    message,
                    "A newer analysis or a logout superseded this run",
                ),
            ),
            AuditError::ReportRender { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("REPORT_ERROR", message),
            ),
        };
        Self { status, error }
    }
}
