//! Error types for the servistrack backend
//!
//! All errors use thiserror for structured error handling.
//! Handlers convert these into JSON HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Bank account not found: {0}")]
    BankAccountNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Todo not found: {0}")]
    TodoNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::JobNotFound(_)
            | AppError::BankAccountNotFound(_)
            | AppError::DocumentNotFound(_)
            | AppError::TodoNotFound(_)
            | AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Technical detail stays in server logs; clients get a generic
        // message for anything that is not their fault.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
