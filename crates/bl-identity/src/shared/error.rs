//! Identity Error Types

use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Directory unavailable: {message}")]
    DirectoryUnavailable { message: String },

    #[error("Directory write failed: {message}")]
    DirectoryWriteFailed { message: String },

    #[error("Local write failed: {message}")]
    LocalWriteFailed { message: String },

    #[error("Local read failed: {message}")]
    LocalReadFailed { message: String },
}

impl IdentityError {
    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    pub fn directory_unavailable(message: impl Into<String>) -> Self {
        Self::DirectoryUnavailable { message: message.into() }
    }

    pub fn directory_write(message: impl Into<String>) -> Self {
        Self::DirectoryWriteFailed { message: message.into() }
    }

    pub fn local_write(message: impl Into<String>) -> Self {
        Self::LocalWriteFailed { message: message.into() }
    }

    pub fn local_read(message: impl Into<String>) -> Self {
        Self::LocalReadFailed { message: message.into() }
    }

    /// Stable machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "MISSING_PARAMETER",
            Self::DirectoryUnavailable { .. } => "DIRECTORY_UNAVAILABLE",
            Self::DirectoryWriteFailed { .. } => "DIRECTORY_WRITE_FAILED",
            Self::LocalWriteFailed { .. } => "LOCAL_WRITE_FAILED",
            Self::LocalReadFailed { .. } => "LOCAL_READ_FAILED",
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;

/// Error response body
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let status = match &self {
            IdentityError::MissingParameter { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
