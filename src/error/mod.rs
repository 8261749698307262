//! Application error types. Every request-level failure becomes an `ApiResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::warn;

use crate::models::ApiResponse;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Body could not be decoded into a cast request.
    #[error("{0}")]
    MalformedBody(String),

    #[error("{0}")]
    Validation(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Endpoint not found")]
    NotFound,

    /// Listener could not be bound; fatal at startup.
    #[error("Failed to bind to port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MalformedBody(_)
            | AppError::Validation(_)
            | AppError::Bind { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        let body = Json(ApiResponse::failure(self.to_string()));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
