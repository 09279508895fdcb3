//! Error types for the RajaOngkir client.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias using the client's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the RajaOngkir client.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Caller Errors
    // =========================================================================
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // Remote API Errors
    // =========================================================================
    #[error("RajaOngkir API error: {0}")]
    Api(ApiError),

    #[error("RajaOngkir API returned no data: {0}")]
    NoData(String),

    #[error("Transport error: {0}")]
    Transport(String),

    // =========================================================================
    // Infrastructure Errors
    // =========================================================================
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a cache error.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Field errors when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Remote API error details, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

/// Which side of the exchange failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 4xx: the request was rejected.
    Client,
    /// 5xx: the upstream failed.
    Server,
}

/// A non-success response from the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status of the response.
    pub status: u16,
    /// Error code reported by the API body, or the HTTP status.
    pub code: i64,
    pub message: String,
    /// Decoded body for client errors. Never populated for server errors.
    pub response: Option<Value>,
}

impl ApiError {
    /// Build a client error from a raw response body.
    ///
    /// Understands the `{"meta": {"message", "code"}}` envelope used by the
    /// Komerce API and falls back to top-level `message`/`error` and
    /// `code`/`status_code` fields. Bodies that are not JSON objects become the
    /// message verbatim.
    pub fn from_response(body: &str, status: u16) -> Self {
        let decoded = match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => value,
            _ => {
                let message = if body.trim().is_empty() {
                    "Unknown API error".to_string()
                } else {
                    body.to_string()
                };
                return Self {
                    kind: ApiErrorKind::Client,
                    status,
                    code: i64::from(status),
                    message,
                    response: Some(serde_json::json!({ "raw": body })),
                };
            }
        };

        let (message, code) = match decoded.get("meta") {
            Some(meta) => (
                meta.get("message").and_then(Value::as_str),
                meta.get("code").and_then(as_code),
            ),
            None => (
                decoded
                    .get("message")
                    .or_else(|| decoded.get("error"))
                    .and_then(Value::as_str),
                decoded
                    .get("code")
                    .or_else(|| decoded.get("status_code"))
                    .and_then(as_code),
            ),
        };

        Self {
            kind: ApiErrorKind::Client,
            status,
            code: code.unwrap_or(i64::from(status)),
            message: message.unwrap_or("An unknown error occurred").to_string(),
            response: Some(decoded),
        }
    }

    /// Build a server error carrying only a generic message.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Server,
            status,
            code: i64::from(status),
            message: message.into(),
            response: None,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.kind == ApiErrorKind::Server
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

fn as_code(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}
