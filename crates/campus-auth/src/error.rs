//! Error types for the pipeline and the session store.

use crate::transport::TransportError;
use campus_storage::StorageError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A field-level validation error reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Body of a non-2xx response.
///
/// The raw text is always kept; `message` and `errors` are filled in when
/// the body follows the server's error envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub errors: Vec<FieldError>,
    pub raw: String,
}

impl ErrorBody {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            return Self {
                raw,
                ..Self::default()
            };
        };

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let errors = value
            .get("errors")
            .cloned()
            .and_then(|errors| serde_json::from_value(errors).ok())
            .unwrap_or_default();

        Self {
            message,
            errors,
            raw,
        }
    }
}

/// Error returned by [`HttpPipeline`](crate::HttpPipeline) calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {}", .body.message.as_deref().unwrap_or("request failed"))]
    Status { status: u16, body: ErrorBody },

    /// No response was received
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request body could not be serialized
    #[error("Could not encode request body for {path}: {reason}")]
    Encode { path: String, reason: String },

    /// A 2xx response did not have the expected shape
    #[error("Malformed response from {path}: {reason}")]
    Decode { path: String, reason: String },

    /// Token storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// HTTP status, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The server's own explanation of the failure, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => body.message.as_deref(),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ApiError::Status { body, .. } => &body.errors,
            _ => &[],
        }
    }
}

/// Result type for pipeline calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by [`SessionStore`](crate::SessionStore) operations.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The server refused the operation. `message` is fit for display.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ApiError,
    },

    /// No refresh token is persisted
    #[error("No refresh token available")]
    RefreshUnavailable,

    /// A pipeline call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid state transition in the session FSM
    #[error("Invalid session state transition: {0}")]
    InvalidStateTransition(String),
}

impl AuthError {
    /// Wrap `source` with the server's message, or `fallback` if it sent none.
    pub fn rejected(source: ApiError, fallback: &str) -> Self {
        let message = source.server_message().unwrap_or(fallback).to_string();
        AuthError::Rejected { message, source }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AuthError::Rejected { source, .. } | AuthError::Api(source) => source.field_errors(),
            _ => &[],
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_parses_envelope() {
        let body = ErrorBody::parse(
            r#"{"success":false,"message":"Validation failed","errors":[{"field":"email","message":"Email is invalid","value":"nope"}]}"#,
        );
        assert_eq!(body.message.as_deref(), Some("Validation failed"));
        assert_eq!(body.errors.len(), 1);
        assert_eq!(body.errors[0].field, "email");
        assert_eq!(body.errors[0].value, Some(Value::from("nope")));
    }

    #[test]
    fn test_error_body_keeps_raw_text() {
        let body = ErrorBody::parse("<html>Bad Gateway</html>");
        assert_eq!(body.message, None);
        assert!(body.errors.is_empty());
        assert_eq!(body.raw, "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_error_body_ignores_unexpected_errors_shape() {
        let body = ErrorBody::parse(r#"{"message":"Nope","errors":"not a list"}"#);
        assert_eq!(body.message.as_deref(), Some("Nope"));
        assert!(body.errors.is_empty());
    }

    #[test]
    fn test_rejected_prefers_server_message() {
        let source = ApiError::Status {
            status: 401,
            body: ErrorBody::parse(r#"{"message":"Invalid email or password"}"#),
        };
        assert!(source.is_unauthorized());

        let err = AuthError::rejected(source, "Login failed");
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_rejected_falls_back_without_response() {
        let source = ApiError::Transport(TransportError::Connection("refused".to_string()));
        assert_eq!(source.status(), None);

        let err = AuthError::rejected(source, "Registration failed");
        assert_eq!(err.to_string(), "Registration failed");
    }

    #[test]
    fn test_blank_server_message_falls_back() {
        let source = ApiError::Status {
            status: 500,
            body: ErrorBody::parse(r#"{"message":"  "}"#),
        };
        let err = AuthError::rejected(source, "Profile update failed");
        assert_eq!(err.to_string(), "Profile update failed");
    }

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: 404,
            body: ErrorBody::parse(r#"{"message":"Event not found"}"#),
        };
        assert_eq!(err.to_string(), "HTTP 404: Event not found");
    }
}
