// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Domain errors returned by the comment service.
///
/// Validation and integrity variants travel unchanged up to the transport
/// boundary. Store failures are logged where they are detected and leave
/// the core as `Internal`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid parent id")]
    InvalidParentId,
    #[error("invalid page")]
    InvalidPage,
    #[error("invalid limit")]
    InvalidLimit,
    #[error("invalid sort, expected created_at_asc or created_at_desc")]
    InvalidSort,
    #[error("invalid comment id")]
    InvalidCommentId,
    #[error("invalid JSON")]
    InvalidJson,
    #[error("content must not be empty")]
    EmptyContent,
    #[error("author must not be empty")]
    EmptyAuthor,
    #[error("{0}")]
    Validation(String),

    #[error("parent comment not found")]
    ParentNotFound,
    #[error("comment not found")]
    CommentNotFound,

    #[error("request cancelled")]
    Cancelled,
    #[error("internal error")]
    Internal,
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 503 Service Unavailable (request cancelled by shutdown)
    ServiceUnavailable(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // The cause was logged where it was detected; never echo it.
            AppError::InternalServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidParentId
            | ServiceError::InvalidPage
            | ServiceError::InvalidLimit
            | ServiceError::InvalidSort
            | ServiceError::InvalidCommentId
            | ServiceError::InvalidJson
            | ServiceError::EmptyContent
            | ServiceError::EmptyAuthor
            | ServiceError::Validation(_) => AppError::BadRequest(err.to_string()),
            ServiceError::ParentNotFound | ServiceError::CommentNotFound => {
                AppError::NotFound(err.to_string())
            }
            ServiceError::Cancelled => AppError::ServiceUnavailable(err.to_string()),
            ServiceError::Internal => AppError::InternalServerError(err.to_string()),
        }
    }
}
