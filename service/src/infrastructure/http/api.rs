use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::AuthError;
use crate::domain::complaint::error::WorkflowError;
use crate::domain::repository::RepositoryError;

// ApiSuccess is a wrapper around a response that includes a status code.

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub(crate) fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// One variant per failure class of the API contract. Status mapping:
/// validation and state conflicts are both 400 and are told apart by the
/// `error` code in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound,
    StateConflict(String),
    InternalServerError(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::UniqueViolation(cause) => Self::StateConflict(cause),
            RepositoryError::DatabaseError(cause) => Self::InternalServerError(cause),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(value: WorkflowError) -> Self {
        match value {
            WorkflowError::Validation(message) => Self::Validation(message),
            WorkflowError::Forbidden(cause) => Self::Forbidden(cause.to_string()),
            WorkflowError::NotFound => Self::NotFound,
            WorkflowError::StateConflict(cause) => Self::StateConflict(cause.to_string()),
            WorkflowError::Storage(cause) => Self::InternalServerError(cause),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                Self::Unauthorized(value.to_string())
            }
            AuthError::Internal(cause) => Self::InternalServerError(cause),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use ApiError::*;

        match self {
            Validation(message) => error_response(StatusCode::BAD_REQUEST, "VALIDATION", message),
            Unauthorized(message) => {
                error_response(StatusCode::UNAUTHORIZED, "AUTHENTICATION", message)
            }
            Forbidden(message) => error_response(StatusCode::FORBIDDEN, "FORBIDDEN", message),
            NotFound => error_response(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "resource not found".to_string(),
            ),
            StateConflict(message) => {
                error_response(StatusCode::BAD_REQUEST, "STATE_CONFLICT", message)
            }
            InternalServerError(cause) => {
                // Logged here, surfaced as a generic message.
                tracing::error!("{}", cause);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

fn error_response(status: StatusCode, code: &'static str, message: String) -> Response {
    (status, Json(ApiErrorBody::new(status, code, message))).into_response()
}

/// The response data format for all error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub status_code: u16,
    pub error: &'static str,
    pub message: String,
}

impl ApiErrorBody {
    pub fn new(status_code: StatusCode, error: &'static str, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            error,
            message,
        }
    }
}
