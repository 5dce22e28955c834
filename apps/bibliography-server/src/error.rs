//! Error types for the bibliography server

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::document::DocumentError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A document operation failed; `message` is what the client sees
    #[error("{message}: {source}")]
    Failed {
        message: String,
        source: DocumentError,
    },

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

impl AppError {
    /// Wrap a document failure with the message shown to clients
    pub fn failed(source: DocumentError, message: impl Into<String>) -> Self {
        AppError::Failed {
            message: message.into(),
            source,
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Invalid path: {}", rejection.body_text()))
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

const PAGE_OUT_OF_RANGE: &str = "Page out of range";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Failed {
                source: DocumentError::PageOutOfRange(..),
                ..
            } => (StatusCode::NOT_FOUND, PAGE_OUT_OF_RANGE.to_string()),
            AppError::Failed { message, source } => {
                tracing::error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            AppError::Document(DocumentError::PageOutOfRange(..)) => {
                (StatusCode::NOT_FOUND, PAGE_OUT_OF_RANGE.to_string())
            }
            AppError::Document(DocumentError::NotFound(path)) => {
                tracing::warn!("Document not found: {}", path);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "PDF file not available".to_string(),
                )
            }
            AppError::Document(e) => {
                tracing::error!("Document error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process document".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::failed(DocumentError::PageOutOfRange(9, 3), "Failed to load page 9"),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::failed(
                    DocumentError::RenderError("boom".into()),
                    "Failed to load page 2",
                ),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::from(DocumentError::NotFound("a.pdf".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_body_is_json() {
        let cases = [
            AppError::BadRequest("Invalid query parameters".into()),
            AppError::from(DocumentError::MuPdf("damaged xref".into())),
        ];
        for error in cases {
            assert_eq!(
                error.into_response().headers()["content-type"],
                "application/json"
            );
        }
    }
}
