//! Error types for phonebook-api

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Result type alias for phonebook-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running the server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from phonebook-core
    #[error("Core error: {0}")]
    Core(#[from] phonebook_core::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error (binding the listener, serving connections)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

/// Handler-level error rendered as a JSON `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: Option<String>,
}

impl ApiError {
    /// A 400 with the given message.
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: Some(message.into()),
        }
    }

    /// A 404 with an empty body.
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: None,
        }
    }

    /// A 404 for routes nobody serves.
    pub fn unknown_endpoint() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: Some("unknown endpoint".to_string()),
        }
    }

    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<phonebook_core::Error> for ApiError {
    fn from(err: phonebook_core::Error) -> Self {
        use phonebook_core::Error as Core;

        match &err {
            Core::NotFound { .. } => ApiError::not_found(),
            Core::Validation { .. } | Core::DuplicateName { .. } | Core::MalformedId { .. } => {
                ApiError::bad_request(err.user_message())
            }
            _ => {
                tracing::error!(error = %err, "request failed");
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: Some(err.user_message()),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.message {
            Some(message) => (self.status, Json(json!({ "error": message }))).into_response(),
            None => self.status.into_response(),
        }
    }
}
