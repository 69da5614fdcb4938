//! Custom error types for the common library
//!
//! Every failure a caller can observe, whether it came from the transport,
//! from the backend, or from client-side validation, is normalized into
//! [`ApiError`]. Its `Display` output is always the human-readable message
//! that a form or listing page shows to the user.

use serde_json::Value;
use thiserror::Error;

/// Fallback message when the backend answers with an error body lacking one
pub const UNKNOWN_API_ERROR: &str = "An unknown API error occurred";

/// Custom error type for API and form operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response
    #[error("{0}")]
    Network(String),

    /// Non-2xx response from the backend
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// A successful call carried no body where one was required
    #[error("Empty response from server")]
    EmptyResponse,

    /// A successful call carried a body that could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Client-side form validation failure
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// Entity lookup failure
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Build a validation error for a form field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            message: message.into(),
        }
    }

    /// The human-readable message carried by this error
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status of the backend response, if the error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_displays_backend_message() {
        let err = ApiError::Status {
            status: 409,
            message: "Email already in use".to_string(),
            details: None,
        };
        assert_eq!(err.to_string(), "Email already in use");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn validation_error_displays_field_message() {
        let err = ApiError::validation("email", "Invalid email address.");
        assert_eq!(err.message(), "Invalid email address.");
        assert_eq!(err.status(), None);
    }
}
