//! # API Errors
//!
//! Maps core outcomes onto HTTP status codes and `{"error": ...}` bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use staffroll_core::EmployeeServiceError;
use thiserror::Error;

/// Store operation a request was performing; selects the opaque message
/// returned when storage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Fetch,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Insert => "Failed to insert employee.",
            Self::Fetch => "Failed to fetch employees.",
            Self::Update => "Failed to update employee.",
            Self::Delete => "Failed to delete employee.",
        }
    }

    fn event(self) -> &'static str {
        match self {
            Self::Insert => "employee_create",
            Self::Fetch => "employee_list",
            Self::Update => "employee_update",
            Self::Delete => "employee_delete",
        }
    }
}

/// REST API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field rule failure; the message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// Body was not JSON of the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Email already exists.")]
    EmailConflict,

    #[error("Employee not found.")]
    NotFound,

    /// Backing store fault. Details are logged, never returned.
    #[error("{}", .0.failure_message())]
    Storage(Operation),
}

impl ApiError {
    /// Translates a service outcome, logging storage details.
    pub fn from_service(operation: Operation, err: EmployeeServiceError) -> Self {
        match err {
            EmployeeServiceError::Validation(err) => Self::Validation(err.to_string()),
            EmployeeServiceError::EmailConflict(_) => Self::EmailConflict,
            EmployeeServiceError::NotFound(_) => Self::NotFound,
            EmployeeServiceError::Storage(inner) => {
                error!(
                    "event={} module=api status=error kind=storage error={}",
                    operation.event(),
                    inner
                );
                Self::Storage(operation)
            }
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::EmailConflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
