//! Error types and handling for the weather gateway

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// A single violated input constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Query parameter the constraint belongs to
    pub field: String,
    /// Human readable description of the constraint
    pub message: String,
}

impl FieldViolation {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Main error type for the weather gateway
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Input validation errors, one entry per violated constraint
    #[error("Invalid input: {}", join_messages(.violations))]
    Validation { violations: Vec<FieldViolation> },

    /// The geocoder had no match for the requested place
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Non-2xx answer or transport fault from the upstream provider
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl WeatherError {
    /// Create a new validation error from the collected violations
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation { violations }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::Validation { .. } => StatusCode::BAD_REQUEST,
            WeatherError::NotFound { .. } => StatusCode::NOT_FOUND,
            WeatherError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            WeatherError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Messages exposed to the caller, verbatim
    #[must_use]
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            WeatherError::Validation { violations } => {
                violations.iter().map(|v| v.message.clone()).collect()
            }
            WeatherError::NotFound { message } | WeatherError::Upstream { message, .. } => {
                vec![message.clone()]
            }
            WeatherError::Config { .. } => {
                vec!["Configuration error. Please check your config file and API keys.".to_string()]
            }
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ErrorMessage {
    Single(String),
    List(Vec<String>),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: ErrorMessage,
    error: String,
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let mut messages = self.user_messages();
        let message = match self {
            WeatherError::Validation { .. } => ErrorMessage::List(messages),
            _ => ErrorMessage::Single(messages.pop().unwrap_or_default()),
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
            error: status.canonical_reason().unwrap_or("Error").to_string(),
        };

        (status, Json(body)).into_response()
    }
}
