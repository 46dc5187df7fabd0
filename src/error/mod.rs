//! Error handling module
//!
//! Two layers of errors live here:
//! - `FetchError` is the taxonomy of a single configuration load. The store
//!   converts it into its `error` cell and never hands it back to callers.
//! - `AppError` covers the ambient failures of the binary: settings files,
//!   IO, the HTTP server and client construction.

pub mod types;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Failure of one attempt to load the configuration document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The resource answered with a non-success HTTP status.
    #[error("Failed to load portfolio config: {status_text}")]
    Load { status: u16, status_text: String },

    /// The body was not a valid configuration document.
    #[error("Failed to parse portfolio config: {message}")]
    Parse { message: String },

    /// The request never produced a response.
    #[error("Failed to reach portfolio config: {message}")]
    Transport { message: String },

    /// The load task was torn down before it settled.
    #[error("Portfolio config load was aborted")]
    Aborted,
}

impl FetchError {
    pub fn load(status: u16, status_text: impl Into<String>) -> Self {
        Self::Load {
            status,
            status_text: status_text.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Load { .. } => "config_load_error",
            Self::Parse { .. } => "config_parse_error",
            Self::Transport { .. } => "config_transport_error",
            Self::Aborted => "config_load_aborted",
        }
    }
}

/// JSON body returned by the server for failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration validation failed: {message}")]
    ConfigValidation {
        message: String,
        field: Option<String>,
    },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {message}")]
    ConfigParse {
        message: String,
        line: Option<usize>,
    },

    #[error("Failed to build HTTP client: {message}")]
    HttpClientBuild { message: String },

    #[error("Document not found: {path}")]
    DocumentNotFound { path: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Portfolio config unavailable: {message}")]
    ConfigUnavailable { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO error during {operation}: {message}")]
    Io { operation: String, message: String },

    #[error("Server error: {message}")]
    Server { message: String },
}

impl AppError {
    pub fn config_validation(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
            field: field.map(ToString::to_string),
        }
    }

    pub fn io(operation: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::DocumentNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ConfigUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Fetch(FetchError::Load { .. } | FetchError::Transport { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::ConfigValidation { .. } => "config_validation",
            Self::ConfigNotFound { .. } => "config_not_found",
            Self::ConfigParse { .. } => "config_parse",
            Self::HttpClientBuild { .. } => "http_client_build",
            Self::DocumentNotFound { .. } => "document_not_found",
            Self::Fetch(inner) => inner.error_type(),
            Self::ConfigUnavailable { .. } => "config_unavailable",
            Self::Serialization { .. } => "serialization",
            Self::Io { .. } => "io",
            Self::Server { .. } => "server",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error.kind = self.error_type(), error = %self, "Request failed");
        } else {
            warn!(error.kind = self.error_type(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error_type: self.error_type().to_string(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_message_carries_status_text() {
        let err = FetchError::load(404, "Not Found");
        assert_eq!(err.to_string(), "Failed to load portfolio config: Not Found");
        assert_eq!(err.error_type(), "config_load_error");
    }

    #[test]
    fn fetch_errors_map_to_gateway_status() {
        let err = AppError::from(FetchError::transport("connection refused"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err = AppError::from(FetchError::parse("expected value"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_document_is_not_found() {
        let err = AppError::DocumentNotFound {
            path: "portfolio-config.json".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_type(), "document_not_found");
    }
}
